//! Image loading for logos and QR bitmaps.
//!
//! Sources can be `data:` URIs, `http(s)` URLs or local paths. Each load is a
//! single attempt bounded by a timeout; every failure mode (bad URL, HTTP
//! error, timeout, decode failure) collapses into [`InsertError::ImageLoad`].
//!
//! Remote fetches are anonymous: the client keeps no cookie store and sends no
//! credentials, so a fetched bitmap never depends on the caller's session.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;

use crate::error::InsertError;

/// Default upper bound for a single image load.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a source string into a decoded bitmap.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, source: &str) -> Result<DynamicImage, InsertError>;
}

/// The default [`ImageSource`]: data URIs, HTTP(S) and files.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageLoader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, InsertError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| InsertError::ImageLoad(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, timeout })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, InsertError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InsertError::ImageLoad(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(InsertError::ImageLoad(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InsertError::ImageLoad(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_bytes(&self, source: &str) -> Result<Vec<u8>, InsertError> {
        if source.starts_with("data:") {
            decode_data_uri(source)
        } else if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch_remote(source).await
        } else {
            let path = source.strip_prefix("file://").unwrap_or(source);
            tokio::fs::read(Path::new(path))
                .await
                .map_err(|e| InsertError::ImageLoad(format!("Failed to read {}: {}", path, e)))
        }
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }
}

#[async_trait]
impl ImageSource for ImageLoader {
    async fn load(&self, source: &str) -> Result<DynamicImage, InsertError> {
        if source.trim().is_empty() {
            return Err(InsertError::ImageLoad("empty image source".to_string()));
        }

        // The client timeout only covers HTTP; this bounds file and decode work too.
        let bytes = tokio::time::timeout(self.timeout, self.fetch_bytes(source))
            .await
            .map_err(|_| {
                InsertError::ImageLoad(format!(
                    "Timed out after {:?} loading {}",
                    self.timeout,
                    describe_source(source)
                ))
            })??;

        image::load_from_memory(&bytes)
            .map_err(|e| InsertError::ImageLoad(format!("Failed to decode image: {}", e)))
    }
}

/// Decode the payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, InsertError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| InsertError::ImageLoad("not a data URI".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| InsertError::ImageLoad("malformed data URI".to_string()))?;
    if !meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(InsertError::ImageLoad(
            "only base64 data URIs are supported".to_string(),
        ));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| InsertError::ImageLoad(format!("invalid base64 payload: {}", e)))
}

/// Encode PNG bytes as a data URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Short form of a source for log and error messages (data URIs can be huge).
pub fn describe_source(source: &str) -> &str {
    if source.starts_with("data:") {
        source.split_once(',').map(|(meta, _)| meta).unwrap_or("data:")
    } else {
        source
    }
}
