use serde::{Deserialize, Serialize, Serializer};

/// Serialized in place of a missing title, matching what the share page
/// consumers expect.
pub const TITLE_FALLBACK: &str = "标题未找到";
/// Serialized in place of a missing note body.
pub const BODY_FALLBACK: &str = "正文未找到";

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
    #[serde(default = "default_save_images")]
    pub save_images: bool,
}

fn default_save_images() -> bool {
    true
}

/// One extracted note. Title and body are `None` when the page carried no
/// usable value; the fallback strings are applied only when serializing, so
/// internal logic never has to compare against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteContent {
    #[serde(serialize_with = "title_or_fallback")]
    pub title: Option<String>,
    #[serde(serialize_with = "body_or_fallback")]
    pub content: Option<String>,
    pub images: Vec<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_images: Option<Vec<String>>,
}

impl NoteContent {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_FALLBACK)
    }

    pub fn display_content(&self) -> &str {
        self.content.as_deref().unwrap_or(BODY_FALLBACK)
    }
}

fn title_or_fallback<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or(TITLE_FALLBACK))
}

fn body_or_fallback<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or(BODY_FALLBACK))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: Option<&str>, content: Option<&str>) -> NoteContent {
        NoteContent {
            title: title.map(String::from),
            content: content.map(String::from),
            images: vec![],
            url: "https://www.xiaohongshu.com/explore/abc".to_string(),
            local_images: None,
        }
    }

    #[test]
    fn missing_fields_serialize_as_fallbacks() {
        let json = serde_json::to_value(note(None, None)).unwrap();
        assert_eq!(json["title"], TITLE_FALLBACK);
        assert_eq!(json["content"], BODY_FALLBACK);
        assert!(json.get("local_images").is_none());
    }

    #[test]
    fn present_fields_serialize_verbatim() {
        let json = serde_json::to_value(note(Some("My Note"), Some("hello"))).unwrap();
        assert_eq!(json["title"], "My Note");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn save_images_defaults_to_true() {
        let req: ExtractRequest = serde_json::from_str(r#"{"url": "x"}"#).unwrap();
        assert!(req.save_images);
        let req: ExtractRequest =
            serde_json::from_str(r#"{"url": "x", "save_images": false}"#).unwrap();
        assert!(!req.save_images);
    }
}
