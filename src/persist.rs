use std::path::{Path, PathBuf};

use chrono::Local;
use url::Url;

use crate::error::ScrapeError;
use crate::extract::Scraper;
use crate::models::NoteContent;

// ── Constants ────────────────────────────────────────────────────────────────

const DIR_PREFIX: &str = "redbook_content";
const SIDECAR_NAME: &str = "info.json";
const DEFAULT_EXTENSION: &str = ".jpg";

// ── Configuration ────────────────────────────────────────────────────────────

/// Where and how to lay out one extraction's output directory.
pub struct SaveConfig {
    /// Parent directory the timestamped output directory is created under.
    pub base_dir: PathBuf,
    /// Character cap on the sanitized title used in the directory name.
    pub title_limit: usize,
}

/// Result of a persistence run: the updated record plus the directory it
/// was written to.
pub struct SavedNote {
    pub note: NoteContent,
    pub dir: PathBuf,
}

// ── Persistence ──────────────────────────────────────────────────────────────

/// Download every image of `note` into a fresh timestamped directory and
/// write an `info.json` sidecar holding the full record.
///
/// A single failed download is logged and skipped; the batch continues and
/// the record stays valid. Only directory creation and the sidecar write are
/// fatal.
pub async fn save_images(
    scraper: &Scraper,
    note: &NoteContent,
    config: &SaveConfig,
) -> Result<SavedNote, ScrapeError> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let safe_title = sanitize_title(note.display_title(), config.title_limit);
    let dir_name = if safe_title.is_empty() {
        format!("{}_{}", DIR_PREFIX, timestamp)
    } else {
        format!("{}_{}_{}", DIR_PREFIX, timestamp, safe_title)
    };
    let dir = config.base_dir.join(dir_name);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ScrapeError::Storage(format!("creating {}: {}", dir.display(), e)))?;

    let total = note.images.len();
    let mut local_images = Vec::new();

    for (i, image_url) in note.images.iter().enumerate() {
        let index = i + 1;
        tracing::info!("downloading image {}/{}", index, total);

        let bytes = match scraper.download(image_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("skipping image {}: {}", image_url, e);
                continue;
            }
        };

        let filename = format!("image_{}{}", index, extension_for(image_url));
        let path = dir.join(&filename);
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            tracing::warn!("skipping image {}: write failed: {}", image_url, e);
            continue;
        }

        local_images.push(path.to_string_lossy().into_owned());
    }

    let mut saved = note.clone();
    saved.local_images = Some(local_images);

    let sidecar = dir.join(SIDECAR_NAME);
    let json = serde_json::to_string_pretty(&saved)
        .map_err(|e| ScrapeError::Storage(e.to_string()))?;
    tokio::fs::write(&sidecar, json)
        .await
        .map_err(|e| ScrapeError::Storage(format!("writing {}: {}", sidecar.display(), e)))?;

    tracing::info!("saved note to {}", dir.display());
    Ok(SavedNote { note: saved, dir })
}

// ── Naming helpers ───────────────────────────────────────────────────────────

/// Reduce a title to a filesystem-safe directory component: alphanumerics,
/// spaces, hyphens, and underscores only, capped at `limit` characters.
pub fn sanitize_title(title: &str, limit: usize) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(limit)
        .collect()
}

/// File extension (with leading dot) taken from the URL path, ignoring any
/// query string. Extensionless URLs get `.jpg`.
fn extension_for(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    match Path::new(&path).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
