//! Download surface abstraction.
//!
//! A `DownloadSurface` provides the primitives the download strategies are
//! built from: fetching media into a blob, exposing a blob through an object
//! URL, "clicking" an anchor, writing the clipboard and showing instructions.
//! The `Downloader` only orchestrates them, so it runs unchanged against the
//! local filesystem (`LocalSurface`) or a test double.

use crate::download::instructions::Affordance;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Failures of a single surface primitive.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The media host refused the request (auth walls, geo blocks, hotlink protection)
    #[error("blocked by remote host ({0})")]
    Blocked(StatusCode),

    /// Any other non-2xx status
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The URL serves a page rather than a media file
    #[error("not a media file (content type {0})")]
    NotMedia(String),

    /// Body exceeds the configured maximum size
    #[error("file exceeds maximum size of {limit} bytes")]
    TooLarge { limit: u64 },

    /// The surface cannot perform this primitive (e.g., browser disabled)
    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Media fetched into memory.
#[derive(Debug, Clone)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Handle to a blob exposed by the surface. Must be revoked once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    pub id: Uuid,
    /// Where the surface staged the blob, if it staged it on disk.
    pub path: Option<PathBuf>,
}

/// What an anchor click points at.
#[derive(Debug, Clone, Copy)]
pub enum AnchorTarget<'a> {
    /// A local object URL: saving it persists the blob.
    Object(&'a ObjectUrl),
    /// A remote URL: the surface hands it to whatever can open it.
    Remote(&'a str),
}

#[async_trait]
pub trait DownloadSurface: Send + Sync {
    /// Fetches `url` fully into memory.
    async fn fetch_blob(&self, url: &str) -> Result<Blob, SurfaceError>;

    /// Exposes `blob` under a new object URL.
    async fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SurfaceError>;

    /// Releases an object URL. Called exactly once per created URL.
    fn revoke_object_url(&self, url: &ObjectUrl);

    /// Clicks an anchor with a `download` attribute of `filename`.
    ///
    /// Returns the saved path when the click persisted a file locally.
    async fn click_anchor(&self, target: AnchorTarget<'_>, filename: &str) -> Result<Option<PathBuf>, SurfaceError>;

    /// Puts `text` on the clipboard. `filename` names the download it accompanies.
    async fn write_clipboard(&self, text: &str, filename: &str) -> Result<(), SurfaceError>;

    /// Presents the manual-download affordance to the user.
    async fn show_instructions(&self, affordance: &Affordance) -> Result<(), SurfaceError>;
}

/// Revokes its object URL when dropped, on every exit path.
pub struct ObjectUrlGuard<'a> {
    surface: &'a dyn DownloadSurface,
    url: ObjectUrl,
}

impl<'a> ObjectUrlGuard<'a> {
    pub fn new(surface: &'a dyn DownloadSurface, url: ObjectUrl) -> Self {
        Self { surface, url }
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }
}

impl Drop for ObjectUrlGuard<'_> {
    fn drop(&mut self) {
        log::debug!("Revoking object URL {}", self.url.id);
        self.surface.revoke_object_url(&self.url);
    }
}
