//! YouTube metadata via oEmbed and noembed.
//!
//! Neither service returns media streams, so the media links of a YouTube
//! record point at converter mirrors: SS-YouTube for the video, YT1S for
//! audio. Those pages are not media files; the downloader recognizes that and
//! hands them to the browser instead.

use super::{decode, query_url, MetadataProvider, Normalized};
use crate::core::error::ProviderFailure;
use crate::core::types::{non_empty, Author, MediaFormat, MediaLinks, MirrorLink, Platform};
use crate::core::validation::SourceUrl;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Shape shared by the YouTube oEmbed endpoint and noembed.
#[derive(Debug, Deserialize)]
struct OembedPayload {
    title: Option<String>,
    author_name: Option<String>,
    author_url: Option<String>,
    thumbnail_url: Option<String>,
    /// noembed only: set when the lookup failed
    error: Option<String>,
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// SS-YouTube "quick download" page for a video id.
pub fn quick_download_url(video_id: &str) -> String {
    format!("https://www.ssyoutube.com/watch?v={}", video_id)
}

/// Quick-download link in the same form the user pasted: `youtu.be` links
/// map to `ssyoutu.be`, everything else to `ssyoutube.com`.
fn quick_link_for(source: &SourceUrl, video_id: &str) -> String {
    match source.url.host_str() {
        Some("youtu.be") | Some("www.youtu.be") => format!("https://ssyoutu.be/{}", video_id),
        _ => quick_download_url(video_id),
    }
}

/// YT1S converter page for `format`.
pub fn yt1s_url(video_id: &str, format: MediaFormat) -> String {
    let target = watch_url(video_id);
    query_url(
        &format!("https://yt1s.com/en/youtube-to-{}", format.extension()),
        &[("q", target.as_str())],
    )
}

/// Mirror pages offered when a YouTube download falls back to instructions.
///
/// # Examples
/// ```
/// use downloadex::core::types::MediaFormat;
/// use downloadex::resolver::providers::youtube::mirror_links;
///
/// let mirrors = mirror_links("dQw4w9WgXcQ", MediaFormat::AudioOnly);
/// assert_eq!(mirrors.len(), 3);
/// assert_eq!(mirrors[0].url, "https://www.ssyoutube.com/watch?v=dQw4w9WgXcQ");
/// assert!(mirrors[1].url.starts_with("https://yt1s.com/en/youtube-to-mp3?q="));
/// ```
pub fn mirror_links(video_id: &str, format: MediaFormat) -> Vec<MirrorLink> {
    let label = format.extension().to_uppercase();
    vec![
        MirrorLink::new(
            format!("SS-YouTube (instant {} download)", label),
            quick_download_url(video_id),
        ),
        MirrorLink::new(format!("YT1S ({} converter)", label), yt1s_url(video_id, format)),
        MirrorLink::new("Y2Mate (high quality)", format!("https://y2mate.com/youtube/{}", video_id)),
    ]
}

/// `@handle` from an author URL like `https://www.youtube.com/@RickAstleyYT`.
fn handle_from_author_url(author_url: Option<&str>) -> Option<String> {
    let url = Url::parse(author_url?).ok()?;
    let first = url.path_segments()?.find(|s| !s.is_empty())?;
    first
        .strip_prefix('@')
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn normalize_oembed(source: &SourceUrl, body: &Value) -> Result<Normalized, ProviderFailure> {
    let payload: OembedPayload = decode(body)?;

    if let Some(error) = non_empty(payload.error) {
        return Err(ProviderFailure::Rejected(error));
    }

    let video_id = source
        .video_id
        .as_deref()
        .ok_or_else(|| ProviderFailure::Rejected("URL carries no YouTube video id".to_string()))?;

    if payload.title.is_none() && payload.author_name.is_none() {
        return Err(ProviderFailure::Rejected("No oEmbed data returned".to_string()));
    }

    Ok(Normalized {
        title: payload.title.unwrap_or_default().trim().to_string(),
        author: Author {
            handle: handle_from_author_url(payload.author_url.as_deref()),
            display_name: non_empty(payload.author_name),
        },
        media: MediaLinks {
            no_watermark_url: Some(quick_link_for(source, video_id)),
            watermark_url: None,
            cover_url: non_empty(payload.thumbnail_url),
            audio_url: Some(yt1s_url(video_id, MediaFormat::AudioOnly)),
        },
        stats: None,
    })
}

/// The official `youtube.com/oembed` endpoint.
pub struct YouTubeOembedProvider {
    base_url: String,
}

impl YouTubeOembedProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

impl MetadataProvider for YouTubeOembedProvider {
    fn name(&self) -> &str {
        "oembed"
    }

    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn endpoint(&self, source: &SourceUrl) -> String {
        let target = source.video_id.as_deref().map(watch_url);
        query_url(
            &self.base_url,
            &[("format", "json"), ("url", target.as_deref().unwrap_or(source.as_str()))],
        )
    }

    fn normalize(&self, source: &SourceUrl, body: &Value) -> Result<Normalized, ProviderFailure> {
        normalize_oembed(source, body)
    }
}

/// noembed.com, which reports failures in a 200 response with `{error}`.
pub struct NoembedProvider {
    base_url: String,
}

impl NoembedProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

impl MetadataProvider for NoembedProvider {
    fn name(&self) -> &str {
        "noembed"
    }

    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn endpoint(&self, source: &SourceUrl) -> String {
        let target = source.video_id.as_deref().map(watch_url);
        query_url(&self.base_url, &[("url", target.as_deref().unwrap_or(source.as_str()))])
    }

    fn normalize(&self, source: &SourceUrl, body: &Value) -> Result<Normalized, ProviderFailure> {
        normalize_oembed(source, body)
    }
}
