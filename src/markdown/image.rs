//! Image embedding for the Markdown renderer.
//!
//! Every `<img>` is resolved to an absolute URL and, when inlining is on,
//! handed to an [`ImageFetcher`] that turns it into a base64 `data:` URL.
//! Nothing here ever fails the conversion: fetch errors, timeouts and
//! panicking fetchers all become an [`ImageEmbedResult`] with a reason.

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::util::detect_mime_type;

/// Alt-text suffix for an image whose fetch reported failure.
pub const WARN_REMOTE: &str = "⚠️ not embedded (remote)";
/// Alt-text suffix for an image whose fetcher blew up.
pub const WARN_ERROR: &str = "⚠️ not embedded (error)";

/// An image successfully converted to a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedImage {
    pub data_url: String,
    pub mime: String,
    pub size_bytes: u64,
}

impl FetchedImage {
    /// Base64-encode raw bytes into a data URL.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
            mime: mime.to_string(),
            size_bytes: bytes.len() as u64,
        }
    }
}

/// Why a fetch did not produce a data URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unsupported source: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Other(String),
}

/// Turns an absolute image URL into a data URL.
///
/// Implementations must give up once `timeout` has elapsed. Closures with
/// the matching signature implement this trait.
pub trait ImageFetcher {
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<FetchedImage, FetchError>;
}

impl<F> ImageFetcher for F
where
    F: FnMut(&str, Duration) -> Result<FetchedImage, FetchError>,
{
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<FetchedImage, FetchError> {
        self(url, timeout)
    }
}

/// Fetcher for hosts that cannot fetch anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl ImageFetcher for NoFetch {
    fn fetch(&mut self, url: &str, _timeout: Duration) -> Result<FetchedImage, FetchError> {
        Err(FetchError::Unsupported(url.to_string()))
    }
}

/// Reads images from the local filesystem.
///
/// Accepts `file://` URLs and plain paths; relative paths are taken from
/// `root` when set. Remote schemes are reported as unsupported.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn locate(&self, url: &str) -> Result<PathBuf, FetchError> {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|()| FetchError::Unsupported(url.to_string())),
            // Windows drive letters parse as one-letter schemes.
            Ok(parsed) if parsed.scheme().len() > 1 => {
                Err(FetchError::Unsupported(url.to_string()))
            }
            _ => {
                let decoded = percent_encoding::percent_decode_str(url).decode_utf8_lossy();
                let path = Path::new(decoded.as_ref());
                Ok(match &self.root {
                    Some(root) if path.is_relative() => root.join(path),
                    _ => path.to_path_buf(),
                })
            }
        }
    }
}

impl ImageFetcher for FileFetcher {
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<FetchedImage, FetchError> {
        let started = Instant::now();
        let path = self.locate(url)?;
        let bytes = std::fs::read(&path).map_err(|e| FetchError::Io(e.to_string()))?;
        if started.elapsed() > timeout {
            return Err(FetchError::Timeout(timeout));
        }

        let name = path.to_string_lossy();
        let mime = detect_mime_type(&name, &bytes)
            .ok_or_else(|| FetchError::Malformed(format!("not an image: {}", path.display())))?;
        Ok(FetchedImage::from_bytes(mime, &bytes))
    }
}

/// Session-scoped cache in front of another fetcher.
///
/// Successful fetches are remembered by URL; failures are retried.
#[derive(Debug, Default)]
pub struct CachingFetcher<F> {
    inner: F,
    cache: HashMap<String, FetchedImage>,
}

impl<F: ImageFetcher> CachingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: ImageFetcher> ImageFetcher for CachingFetcher<F> {
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<FetchedImage, FetchError> {
        if let Some(hit) = self.cache.get(url) {
            log::trace!("image cache hit: {url}");
            return Ok(hit.clone());
        }
        let fetched = self.inner.fetch(url, timeout)?;
        self.cache.insert(url.to_string(), fetched.clone());
        Ok(fetched)
    }
}

/// What happened to one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedOutcome {
    /// Replaced by a data URL (or already was one).
    Embedded,
    /// Inlining is turned off; no fetch attempted.
    Skipped,
    /// The fetcher returned an error.
    Failed,
    /// The fetcher panicked.
    Errored,
}

/// Per-image embedding record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEmbedResult {
    /// Absolute source URL.
    pub url: String,
    pub embedded: bool,
    pub outcome: EmbedOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ImageEmbedResult {
    fn from_fetched(url: &str, image: FetchedImage) -> Self {
        Self {
            url: url.to_string(),
            embedded: true,
            outcome: EmbedOutcome::Embedded,
            data_url: Some(image.data_url),
            mime: Some(image.mime),
            size_bytes: Some(image.size_bytes),
            reason: None,
        }
    }

    fn not_embedded(url: &str, outcome: EmbedOutcome, reason: String) -> Self {
        Self {
            url: url.to_string(),
            embedded: false,
            outcome,
            data_url: None,
            mime: None,
            size_bytes: None,
            reason: Some(reason),
        }
    }

    /// Record for an image left alone because inlining is off.
    pub fn skipped(url: &str) -> Self {
        Self::not_embedded(url, EmbedOutcome::Skipped, "inlining disabled".to_string())
    }

    /// The URL to put in the Markdown image.
    pub fn source(&self) -> &str {
        self.data_url.as_deref().unwrap_or(&self.url)
    }

    /// Warning to append to the alt text, if any.
    pub fn alt_warning(&self) -> Option<&'static str> {
        match self.outcome {
            EmbedOutcome::Failed => Some(WARN_REMOTE),
            EmbedOutcome::Errored => Some(WARN_ERROR),
            EmbedOutcome::Embedded | EmbedOutcome::Skipped => None,
        }
    }
}

/// Aggregate counts for caller-side reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageStats {
    pub total: usize,
    pub embedded: usize,
    pub failed: usize,
}

impl ImageStats {
    pub fn record(&mut self, result: &ImageEmbedResult) {
        self.total += 1;
        match result.outcome {
            EmbedOutcome::Embedded => self.embedded += 1,
            EmbedOutcome::Failed | EmbedOutcome::Errored => self.failed += 1,
            EmbedOutcome::Skipped => {}
        }
    }
}

impl fmt::Display for ImageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "embedded {}/{} images", self.embedded, self.total)?;
        if self.failed > 0 {
            write!(f, " ({} failed)", self.failed)?;
        }
        Ok(())
    }
}

/// Resolve an image or link reference against the document base URL.
///
/// References that cannot be joined are returned unchanged.
pub fn resolve_url(base: Option<&Url>, reference: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("data:") {
        return reference.to_string();
    }
    match base {
        Some(base) => base
            .join(reference)
            .map(String::from)
            .unwrap_or_else(|_| reference.to_string()),
        None => reference.to_string(),
    }
}

/// Fetch one image, absorbing every failure into the result.
pub fn embed_image<F: ImageFetcher + ?Sized>(
    fetcher: &mut F,
    url: &str,
    timeout: Duration,
) -> ImageEmbedResult {
    if let Some(image) = parse_data_url(url) {
        return ImageEmbedResult::from_fetched(url, image);
    }

    match catch_unwind(AssertUnwindSafe(|| fetcher.fetch(url, timeout))) {
        Ok(Ok(image)) if image.data_url.starts_with("data:") => {
            log::debug!("embedded {url} ({} bytes, {})", image.size_bytes, image.mime);
            ImageEmbedResult::from_fetched(url, image)
        }
        Ok(Ok(_)) => {
            let err = FetchError::Malformed("fetcher returned a non-data URL".to_string());
            log::warn!("image not embedded: {url}: {err}");
            ImageEmbedResult::not_embedded(url, EmbedOutcome::Failed, err.to_string())
        }
        Ok(Err(err)) => {
            log::warn!("image not embedded: {url}: {err}");
            ImageEmbedResult::not_embedded(url, EmbedOutcome::Failed, err.to_string())
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "image fetcher panicked".to_string());
            log::warn!("image fetcher panicked on {url}: {reason}");
            ImageEmbedResult::not_embedded(url, EmbedOutcome::Errored, reason)
        }
    }
}

/// Describe an inline `data:` URL without decoding it.
fn parse_data_url(url: &str) -> Option<FetchedImage> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.split(';').next().filter(|m| !m.is_empty()).unwrap_or("text/plain");
    let size_bytes = if header.ends_with(";base64") {
        let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
        (payload.len() / 4 * 3).saturating_sub(padding) as u64
    } else {
        payload.len() as u64
    };
    Some(FetchedImage {
        data_url: url.to_string(),
        mime: mime.to_string(),
        size_bytes,
    })
}
