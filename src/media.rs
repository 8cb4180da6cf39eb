//! Base64 image uploads: decoding, storage under the media directory, and URLs.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid base64 payload")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Payload is not a supported image")]
    UnsupportedImage,

    #[error("Empty image payload")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decode `data:image/<ext>;base64,<payload>` or a bare base64 payload.
/// The stored extension comes from the file signature, not the declared type.
pub fn decode_image(data: &str) -> Result<DecodedImage, MediaError> {
    let payload = match data.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => data,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return Err(MediaError::Empty);
    }

    let bytes = STANDARD.decode(payload.as_bytes())?;
    let extension = sniff_extension(&bytes).ok_or(MediaError::UnsupportedImage)?;
    Ok(DecodedImage { bytes, extension })
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// Write a decoded image and return its path relative to `media_dir`.
pub fn store_image(media_dir: &Path, image: &DecodedImage) -> Result<String, MediaError> {
    let dir = media_dir.join(RECIPE_IMAGE_DIR);
    std::fs::create_dir_all(&dir)?;

    let file_name = format!("{}.{}", uuid::Uuid::now_v7(), image.extension);
    std::fs::write(dir.join(&file_name), &image.bytes)?;

    Ok(format!("{}/{}", RECIPE_IMAGE_DIR, file_name))
}

/// Best-effort removal of a stored file.
pub fn remove_image(media_dir: &Path, relative: &str) {
    if let Some(path) = resolve(media_dir, relative) {
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!("Failed to remove media file {}: {}", path.display(), e);
        }
    }
}

/// Public URL of a stored file.
pub fn media_url(relative: &str) -> String {
    format!("/media/{}", relative)
}

/// Join a request path onto `media_dir`, refusing anything that could escape it.
pub fn resolve(media_dir: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(media_dir.join(relative))
    } else {
        None
    }
}
