use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::foundation::error::{PlaceholdError, PlaceholdResult};

/// Where the single font used for a render comes from.
#[derive(Clone, Debug)]
pub enum FontSource {
    /// Bytes loaded once at startup.
    Static(Arc<[u8]>),
    /// Read from disk on every render.
    File(PathBuf),
    /// Fetched over HTTP(S) on every render.
    Http(String),
}

impl FromStr for FontSource {
    type Err = std::convert::Infallible;

    /// `http://` and `https://` values are URLs, anything else is a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(FontSource::Http(s.to_string()))
        } else {
            Ok(FontSource::File(PathBuf::from(s)))
        }
    }
}

/// Bounded retry schedule for font fetches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before attempt `attempt + 1` (1-based), with up to 50% jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let exp = base_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(16));
        let jitter_bound = exp / 2;
        if jitter_bound == 0 {
            return Duration::from_millis(exp);
        }
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Duration::from_millis(exp.saturating_add(seed % (jitter_bound + 1)))
    }
}

/// A parsed font resource: raw bytes plus the family name of its first face.
#[derive(Clone, Debug)]
pub struct FontData {
    family: String,
    bytes: Arc<[u8]>,
}

impl FontData {
    /// Fails unless the bytes hold at least one face `fontdb` can read.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> PlaceholdResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(PlaceholdError::font_fetch("font resource is empty"));
        }

        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes.to_vec());
        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| {
                PlaceholdError::font_fetch("font resource contains no usable faces")
            })?;

        Ok(Self { family, bytes })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Media type for embedding, sniffed from the file signature.
    pub fn media_type(&self) -> &'static str {
        match self.bytes.get(..4) {
            Some(b"OTTO") => "font/otf",
            Some(b"ttcf") => "font/collection",
            Some(b"wOFF") => "font/woff",
            Some(b"wOF2") => "font/woff2",
            _ => "font/ttf",
        }
    }

    /// A font database holding exactly this font.
    pub(crate) fn database(&self) -> usvg::fontdb::Database {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(self.bytes.to_vec());
        db
    }
}

struct FetchError {
    message: String,
    retryable: bool,
}

impl FontSource {
    /// Obtain and parse the font, retrying transient failures per `retry`.
    #[tracing::instrument(skip(self, client), fields(source = %self.describe()))]
    pub async fn load(
        &self,
        client: &reqwest::Client,
        retry: &RetryPolicy,
    ) -> PlaceholdResult<FontData> {
        let attempts = retry.attempts.max(1);
        let mut attempt = 1;
        let bytes = loop {
            match self.fetch_once(client).await {
                Ok(bytes) => break bytes,
                Err(err) if err.retryable && attempt < attempts => {
                    let delay = retry.delay(attempt);
                    tracing::warn!(
                        attempt,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err.message,
                        "font fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(PlaceholdError::font_fetch(format!(
                        "{} (attempt {attempt}/{attempts})",
                        err.message
                    )));
                }
            }
        };
        FontData::from_bytes(bytes)
    }

    fn describe(&self) -> String {
        match self {
            FontSource::Static(b) => format!("static:{}B", b.len()),
            FontSource::File(p) => format!("file:{}", p.display()),
            FontSource::Http(url) => url.clone(),
        }
    }

    async fn fetch_once(&self, client: &reqwest::Client) -> Result<Arc<[u8]>, FetchError> {
        match self {
            FontSource::Static(bytes) => Ok(Arc::clone(bytes)),
            FontSource::File(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|e| FetchError {
                    message: format!("read font '{}': {e}", path.display()),
                    retryable: !matches!(
                        e.kind(),
                        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                    ),
                }),
            FontSource::Http(url) => {
                let resp = client.get(url).send().await.map_err(|e| FetchError {
                    message: format!("fetch font '{url}': {e}"),
                    retryable: e.is_timeout() || e.is_connect() || e.is_request(),
                })?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError {
                        message: format!("fetch font '{url}': HTTP {}", status.as_u16()),
                        retryable: is_retryable_status(status),
                    });
                }
                let body = resp.bytes().await.map_err(|e| FetchError {
                    message: format!("read font body '{url}': {e}"),
                    retryable: true,
                })?;
                Ok(Arc::from(&body[..]))
            }
        }
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

#[cfg(test)]
#[path = "../../tests/unit/render/font.rs"]
mod tests;
