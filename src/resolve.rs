use once_cell::sync::Lazy;
use regex::Regex;

// ── Short-link resolution ────────────────────────────────────────────────────

/// Substring that marks share text as containing a shortened note link.
const SHORT_LINK_MARKER: &str = "xhslink.com";

// The shortener only ever hands out plain http:// links, so that is all the
// pattern accepts.
static SHORT_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http://xhslink\.com/[a-zA-Z0-9/]+\b").unwrap());

/// Pull the note URL out of free-form share text.
///
/// Text containing the shortener domain is scanned for the first short link;
/// anything else is assumed to already be a direct URL and returned as-is.
/// Returns `None` for empty input or for text that names the shortener
/// without containing a well-formed link.
pub fn resolve(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if text.contains(SHORT_LINK_MARKER) {
        SHORT_LINK_RE.find(text).map(|m| m.as_str().to_string())
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_short_link_is_returned_verbatim() {
        let text = "96 看看这个笔记 http://xhslink.com/aB3xY9, 复制本条信息 \
                    http://xhslink.com/zZ9 打开app";
        assert_eq!(resolve(text).as_deref(), Some("http://xhslink.com/aB3xY9"));
    }

    #[test]
    fn text_without_marker_passes_through() {
        let url = "https://www.xiaohongshu.com/explore/64a1b2c3";
        assert_eq!(resolve(url).as_deref(), Some(url));
    }

    #[test]
    fn marker_without_link_resolves_to_nothing() {
        assert_eq!(resolve("search for xhslink.com later"), None);
    }

    #[test]
    fn https_short_links_are_not_matched() {
        // Only plain http short links exist in the wild; the secure variant
        // is deliberately not recognized.
        assert_eq!(resolve("see https://xhslink.com/aB3xY9 now"), None);
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        assert_eq!(resolve(""), None);
    }
}
