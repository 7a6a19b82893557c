//! Image reference resolution and the placeholder cat.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::consts::IMAGE_LOAD_TIMEOUT;

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 500"><rect width="500" height="500" fill="#FFF8F9"/><circle cx="250" cy="250" r="150" fill="#FFB3D9" opacity="0.3"/><text x="250" y="300" font-size="150" text-anchor="middle" fill="#FF8EC7">🐱</text></svg>"##;

/// Generated placeholder image as an SVG data URI.
pub fn placeholder_image() -> String {
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        urlencoding::encode(PLACEHOLDER_SVG)
    )
}

/// Pick the image source to display for an optional reference.
///
/// Data URIs and http(s) URLs pass through, as does anything else that is
/// non-empty (relative paths). Only a missing or blank reference becomes
/// the placeholder.
pub fn resolve_image(image_url: Option<&str>) -> String {
    match image_url.map(str::trim) {
        None | Some("") => placeholder_image(),
        Some(url) => url.to_string(),
    }
}

pub fn is_data_uri(src: &str) -> bool {
    src.starts_with("data:")
}

pub fn is_http_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image request failed with status {0}")]
    Status(u16),
    #[error("image request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed data URI")]
    MalformedDataUri,
    #[error("invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image file not found: {0}")]
    Missing(String),
}

/// Tries to load an image reference the way a renderer would.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, src: &str) -> Result<(), ImageLoadError>;
}

/// Fetches http(s) images, decodes data URIs, and checks local paths.
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    /// Loader that gives up on an image after [`IMAGE_LOAD_TIMEOUT`].
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(IMAGE_LOAD_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

/// Check a data URI's payload. Only `;base64` payloads can be malformed.
pub fn check_data_uri(src: &str) -> Result<(), ImageLoadError> {
    let rest = src
        .strip_prefix("data:")
        .ok_or(ImageLoadError::MalformedDataUri)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(ImageLoadError::MalformedDataUri)?;

    if header.ends_with(";base64") {
        let bytes = STANDARD.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(ImageLoadError::MalformedDataUri);
        }
    }
    Ok(())
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, src: &str) -> Result<(), ImageLoadError> {
        if is_data_uri(src) {
            return check_data_uri(src);
        }

        if is_http_url(src) {
            let resp = self.client.get(src).send().await?;
            if !resp.status().is_success() {
                return Err(ImageLoadError::Status(resp.status().as_u16()));
            }
            return Ok(());
        }

        match tokio::fs::try_exists(Path::new(src)).await {
            Ok(true) => Ok(()),
            _ => Err(ImageLoadError::Missing(src.to_string())),
        }
    }
}
