//! One user request from URL to downloaded file.
//!
//! A `Session` carries the resolved metadata and its caption from the
//! resolver to the downloader. Each request owns its own session.

use crate::core::caption::build_caption;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{MediaFormat, MirrorLink, Platform, VideoMetadata};
use crate::core::validation::extract_youtube_id;
use crate::download::{suggested_filename, DownloadOutcome, DownloadRequest, Downloader};
use crate::resolver::providers::youtube::mirror_links;
use crate::resolver::Resolver;
use url::Url;

/// Choices for a single download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format: MediaFormat,
    /// Fall back to the watermarked variant when no clean one exists.
    pub allow_watermark: bool,
    /// Overrides the generated `DownloadeX_...` name.
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub metadata: VideoMetadata,
    pub caption: String,
}

impl Session {
    /// Resolves `raw_url` and generates its caption.
    pub async fn start(resolver: &Resolver, raw_url: &str) -> AppResult<Self> {
        let metadata = resolver.resolve(raw_url).await?;
        Ok(Self::from_metadata(metadata))
    }

    pub fn from_metadata(metadata: VideoMetadata) -> Self {
        let caption = build_caption(&metadata);
        Self { metadata, caption }
    }

    /// Builds the download request for `options`.
    ///
    /// Fails with `EmptyResult` when the requested variant is unavailable,
    /// e.g. only a watermarked video exists and `allow_watermark` is off.
    pub fn request(&self, options: &DownloadOptions) -> AppResult<DownloadRequest> {
        let media_url = self
            .metadata
            .select_media(options.format, options.allow_watermark)
            .ok_or_else(|| {
                let reason = match options.format {
                    MediaFormat::Video if self.metadata.media.watermark_url.is_some() => {
                        "only a watermarked video is available (use --allow-watermark)"
                    }
                    MediaFormat::Video => "no video link available",
                    MediaFormat::AudioOnly => "no audio link available",
                };
                AppError::EmptyResult(reason.to_string())
            })?;

        let filename = options
            .filename
            .clone()
            .unwrap_or_else(|| suggested_filename(self.metadata.platform, options.format));

        Ok(DownloadRequest::new(media_url, options.format, &filename).with_mirrors(self.mirrors(options.format)))
    }

    /// Converter mirrors for YouTube videos; empty for TikTok.
    pub fn mirrors(&self, format: MediaFormat) -> Vec<MirrorLink> {
        if self.metadata.platform != Platform::YouTube {
            return Vec::new();
        }
        Url::parse(&self.metadata.source_url)
            .ok()
            .and_then(|url| extract_youtube_id(&url))
            .map(|id| mirror_links(&id, format))
            .unwrap_or_default()
    }

    /// Copies the caption, then runs the download strategies.
    pub async fn download(&self, downloader: &Downloader, options: &DownloadOptions) -> AppResult<DownloadOutcome> {
        let request = self.request(options)?;
        let copied = downloader.copy_caption(&self.caption, &request.suggested_filename).await;
        let request = request.with_caption_copied(copied);
        Ok(downloader.download(&request).await)
    }
}
