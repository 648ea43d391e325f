//! Media download with degrading strategies.
//!
//! `Downloader::download` never fails. It tries, in order:
//! 1. fetch the media into a blob and save it through an object URL
//! 2. point an anchor straight at the remote URL (browser takes over)
//! 3. show manual instructions
//!
//! Each strategy runs only when the previous one failed.

pub mod instructions;
pub mod local;
pub mod surface;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::types::{MediaFormat, MirrorLink, Platform};
use crate::core::validation::sanitize_filename;
use instructions::Affordance;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use surface::{AnchorTarget, DownloadSurface, ObjectUrlGuard, SurfaceError};

pub use instructions::render_instructions;
pub use local::{LocalSurface, LocalSurfaceOptions};

/// One download to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Media URL to retrieve.
    pub source_url: String,
    pub format: MediaFormat,
    pub suggested_filename: String,
    /// Alternative sites listed in the manual instructions.
    pub mirrors: Vec<MirrorLink>,
    /// Whether the caption reached the clipboard beforehand.
    pub caption_copied: bool,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, format: MediaFormat, suggested_filename: &str) -> Self {
        Self {
            source_url: source_url.into(),
            format,
            suggested_filename: sanitize_filename(suggested_filename),
            mirrors: Vec::new(),
            caption_copied: false,
        }
    }

    pub fn with_mirrors(mut self, mirrors: Vec<MirrorLink>) -> Self {
        self.mirrors = mirrors;
        self
    }

    pub fn with_caption_copied(mut self, copied: bool) -> Self {
        self.caption_copied = copied;
        self
    }

    fn affordance(&self) -> Affordance {
        Affordance {
            media_url: self.source_url.clone(),
            filename: self.suggested_filename.clone(),
            format: self.format,
            mirrors: self.mirrors.clone(),
            caption_copied: self.caption_copied,
        }
    }
}

/// How a download ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The file was saved; `saved_to` is set when the surface knows where.
    Completed { saved_to: Option<PathBuf> },
    /// The remote URL was handed to the browser.
    OpenedInNewTab,
    /// Manual instructions were presented.
    InstructionsShown,
}

/// `DownloadeX_<Platform>_<millis>.<ext>`
///
/// # Examples
/// ```
/// use downloadex::core::types::{MediaFormat, Platform};
/// use downloadex::download::suggested_filename_at;
///
/// assert_eq!(
///     suggested_filename_at(Platform::TikTok, MediaFormat::Video, 1700000000000),
///     "DownloadeX_TikTok_1700000000000.mp4"
/// );
/// ```
pub fn suggested_filename_at(platform: Platform, format: MediaFormat, unix_millis: i64) -> String {
    sanitize_filename(&format!(
        "{}_{}_{}.{}",
        config::download::FILENAME_PREFIX,
        platform,
        unix_millis,
        format.extension()
    ))
}

/// Default filename stamped with the current time.
pub fn suggested_filename(platform: Platform, format: MediaFormat) -> String {
    suggested_filename_at(platform, format, chrono::Utc::now().timestamp_millis())
}

pub struct Downloader {
    surface: Arc<dyn DownloadSurface>,
}

impl Downloader {
    pub fn new(surface: Arc<dyn DownloadSurface>) -> Self {
        Self { surface }
    }

    /// Delivers `caption` to the clipboard. Returns whether it worked.
    pub async fn copy_caption(&self, caption: &str, filename: &str) -> bool {
        match self.surface.write_clipboard(caption, filename).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to copy caption: {}", e);
                false
            }
        }
    }

    pub async fn download(&self, request: &DownloadRequest) -> DownloadOutcome {
        log::info!("⬇️ Downloading {} as {}", request.source_url, request.suggested_filename);

        let direct_err = match self.save_via_blob(request).await {
            Ok(saved_to) => {
                log::info!("✅ Download completed");
                return DownloadOutcome::Completed { saved_to };
            }
            Err(e) => e,
        };
        log::warn!("Direct download failed: {}", direct_err);

        let anchor_err = match self
            .surface
            .click_anchor(AnchorTarget::Remote(&request.source_url), &request.suggested_filename)
            .await
        {
            Ok(_) => return DownloadOutcome::OpenedInNewTab,
            Err(e) => e,
        };
        log::warn!("Anchor download failed: {}", anchor_err);

        let blocked = AppError::DownloadBlocked(format!("direct: {}; anchor: {}", direct_err, anchor_err));
        log::warn!("{} → showing instructions", blocked);

        if let Err(e) = self.surface.show_instructions(&request.affordance()).await {
            log::error!("Failed to show instructions: {}", e);
        }
        DownloadOutcome::InstructionsShown
    }

    /// Strategy 1. The object URL is revoked when `guard` drops, whichever
    /// way this returns.
    async fn save_via_blob(&self, request: &DownloadRequest) -> Result<Option<PathBuf>, SurfaceError> {
        let blob = self.surface.fetch_blob(&request.source_url).await?;
        let object_url = self.surface.create_object_url(blob).await?;
        let guard = ObjectUrlGuard::new(self.surface.as_ref(), object_url);
        let saved_to = self
            .surface
            .click_anchor(AnchorTarget::Object(guard.url()), &request.suggested_filename)
            .await?;
        Ok(saved_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::surface::{Blob, ObjectUrl};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Records every primitive call; failure switches per primitive.
    #[derive(Default)]
    struct MockSurface {
        fail_fetch: bool,
        fail_save: bool,
        fail_remote: bool,
        calls: Mutex<Vec<String>>,
        revoked: Mutex<Vec<Uuid>>,
        shown: Mutex<Vec<Affordance>>,
    }

    impl MockSurface {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DownloadSurface for MockSurface {
        async fn fetch_blob(&self, _url: &str) -> Result<Blob, SurfaceError> {
            self.record("fetch_blob");
            if self.fail_fetch {
                return Err(SurfaceError::Blocked(reqwest::StatusCode::FORBIDDEN));
            }
            Ok(Blob {
                data: bytes::Bytes::from_static(b"data"),
                content_type: None,
            })
        }

        async fn create_object_url(&self, _blob: Blob) -> Result<ObjectUrl, SurfaceError> {
            self.record("create_object_url");
            Ok(ObjectUrl {
                id: Uuid::new_v4(),
                path: None,
            })
        }

        fn revoke_object_url(&self, url: &ObjectUrl) {
            self.record("revoke_object_url");
            self.revoked.lock().unwrap().push(url.id);
        }

        async fn click_anchor(&self, target: AnchorTarget<'_>, filename: &str) -> Result<Option<PathBuf>, SurfaceError> {
            match target {
                AnchorTarget::Object(_) => {
                    self.record("click_object");
                    if self.fail_save {
                        return Err(SurfaceError::Unsupported("save refused".to_string()));
                    }
                    Ok(Some(PathBuf::from(filename)))
                }
                AnchorTarget::Remote(_) => {
                    self.record("click_remote");
                    if self.fail_remote {
                        return Err(SurfaceError::Unsupported("no browser".to_string()));
                    }
                    Ok(None)
                }
            }
        }

        async fn write_clipboard(&self, _text: &str, _filename: &str) -> Result<(), SurfaceError> {
            self.record("write_clipboard");
            Ok(())
        }

        async fn show_instructions(&self, affordance: &Affordance) -> Result<(), SurfaceError> {
            self.record("show_instructions");
            self.shown.lock().unwrap().push(affordance.clone());
            Ok(())
        }
    }

    fn request() -> DownloadRequest {
        DownloadRequest::new("https://cdn.test/v.mp4", MediaFormat::Video, "DownloadeX_TikTok_1.mp4")
    }

    #[tokio::test]
    async fn test_direct_download_completes_and_revokes_once() {
        let surface = Arc::new(MockSurface::default());
        let outcome = Downloader::new(surface.clone()).download(&request()).await;

        assert_eq!(
            outcome,
            DownloadOutcome::Completed {
                saved_to: Some(PathBuf::from("DownloadeX_TikTok_1.mp4"))
            }
        );
        assert_eq!(
            surface.calls(),
            vec!["fetch_blob", "create_object_url", "click_object", "revoke_object_url"]
        );
        assert_eq!(surface.revoked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_still_revokes_and_falls_back() {
        let surface = Arc::new(MockSurface {
            fail_save: true,
            ..Default::default()
        });
        let outcome = Downloader::new(surface.clone()).download(&request()).await;

        assert_eq!(outcome, DownloadOutcome::OpenedInNewTab);
        assert_eq!(
            surface.calls(),
            vec![
                "fetch_blob",
                "create_object_url",
                "click_object",
                "revoke_object_url",
                "click_remote"
            ]
        );
    }

    #[tokio::test]
    async fn test_blocked_fetch_opens_remote() {
        let surface = Arc::new(MockSurface {
            fail_fetch: true,
            ..Default::default()
        });
        let outcome = Downloader::new(surface.clone()).download(&request()).await;

        assert_eq!(outcome, DownloadOutcome::OpenedInNewTab);
        assert_eq!(surface.calls(), vec!["fetch_blob", "click_remote"]);
        assert!(surface.revoked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_everything_blocked_shows_instructions() {
        let surface = Arc::new(MockSurface {
            fail_fetch: true,
            fail_remote: true,
            ..Default::default()
        });
        let mirrors = vec![MirrorLink::new("Y2Mate (high quality)", "https://y2mate.com/youtube/x")];
        let req = request().with_mirrors(mirrors.clone()).with_caption_copied(true);
        let outcome = Downloader::new(surface.clone()).download(&req).await;

        assert_eq!(outcome, DownloadOutcome::InstructionsShown);
        let shown = surface.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].media_url, "https://cdn.test/v.mp4");
        assert_eq!(shown[0].mirrors, mirrors);
        assert!(shown[0].caption_copied);
    }

    #[tokio::test]
    async fn test_copy_caption() {
        let surface = Arc::new(MockSurface::default());
        assert!(Downloader::new(surface.clone()).copy_caption("CAPTION", "x.mp4").await);
        assert_eq!(surface.calls(), vec!["write_clipboard"]);
    }

    #[test]
    fn test_suggested_filename_audio() {
        assert_eq!(
            suggested_filename_at(Platform::YouTube, MediaFormat::AudioOnly, 42),
            "DownloadeX_YouTube_42.mp3"
        );
        assert!(suggested_filename(Platform::TikTok, MediaFormat::Video).starts_with("DownloadeX_TikTok_"));
    }

    #[test]
    fn test_request_sanitizes_filename() {
        let req = DownloadRequest::new("https://cdn.test/v.mp4", MediaFormat::Video, "../bad:name.mp4");
        assert_eq!(req.suggested_filename, "badname.mp4");
    }
}
