//! Portrait loading for roster characters.
//!
//! Reads an image file and turns it into a `data:` URL so the engine can
//! keep it as an opaque string. No decoding or size checks happen here.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Guess a MIME type from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes as a base64 data URL.
pub fn to_data_url(data: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(data))
}

/// Read an image file into a data URL.
pub async fn load_data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    debug!("Loaded image {} ({} bytes)", path.display(), data.len());
    Ok(to_data_url(&data, mime_type_for(path)))
}
