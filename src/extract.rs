use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::models::NoteContent;

// ── Constants ────────────────────────────────────────────────────────────────

// The note page serves a stripped-down shell to anything that does not look
// like a desktop browser, so every outbound request carries these headers.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Branding suffix the site appends to every og:title value.
const TITLE_SUFFIX: &str = " - 小红书";

const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

// ── Scraper ──────────────────────────────────────────────────────────────────

/// Stateless fetcher for note pages and their images. Holds a single
/// pre-configured HTTP client; construct once and borrow at call sites.
pub struct Scraper {
    client: reqwest::Client,
}

impl Scraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, ACCEPT.parse().unwrap());
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            ACCEPT_LANGUAGE.parse().unwrap(),
        );

        let client = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        Ok(Scraper { client })
    }

    /// Fetch a note page and extract title, body, and image URLs.
    pub async fn fetch_note(&self, url: &str) -> Result<NoteContent, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::from_request)?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::Parse(e.to_string()))?;

        Ok(parse_note(&html, url))
    }

    /// Fetch a single image, returning its raw bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::from_request)?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

// ── HTML extraction ──────────────────────────────────────────────────────────

/// Pure extraction step: same HTML in, same record out.
///
/// The page exposes exactly two hook points — og: meta tags (title, images)
/// and the `#detail-desc` element for the body. Anything missing falls back
/// to `None`; the serialization layer substitutes the fallback strings.
pub fn parse_note(html: &str, url: &str) -> NoteContent {
    let document = Html::parse_document(html);

    // The site tags its open-graph metadata with name= rather than property=.
    let title_sel = Selector::parse(r#"meta[name="og:title"]"#).unwrap();
    let title = document
        .select(&title_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| {
            content
                .strip_suffix(TITLE_SUFFIX)
                .unwrap_or(content)
                .to_string()
        });

    let body_sel = Selector::parse("#detail-desc").unwrap();
    let content = document
        .select(&body_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());

    let image_sel = Selector::parse(r#"meta[name="og:image"]"#).unwrap();
    let images: Vec<String> = document
        .select(&image_sel)
        .filter_map(|el| el.value().attr("content"))
        .map(|s| s.to_string())
        .collect();

    NoteContent {
        title,
        content,
        images,
        url: url.to_string(),
        local_images: None,
    }
}
