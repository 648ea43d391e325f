//! URL and filename validation utilities
//!
//! Provides whitelist-based validation for user input:
//! - TikTok URL validation (including mobile short links)
//! - YouTube URL validation and 11-character video id extraction
//! - Filename sanitization (remove filesystem-unsafe characters)

use crate::core::types::Platform;
use thiserror::Error;
use url::Url;

/// Hosts accepted for TikTok links.
const TIKTOK_HOSTS: &[&str] = &["tiktok.com", "www.tiktok.com", "vm.tiktok.com", "vt.tiktok.com", "m.tiktok.com"];

/// TikTok hosts that issue short links needing expansion.
const TIKTOK_SHORT_HOSTS: &[&str] = &["vm.tiktok.com", "vt.tiktok.com"];

/// Hosts accepted for YouTube links.
const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com", "music.youtube.com"];

/// Short YouTube host.
const YOUTU_BE_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Length of a YouTube video id.
pub const YOUTUBE_ID_LEN: usize = 11;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Not parseable as a URL at all
    #[error("Please enter a valid TikTok or YouTube URL")]
    Unparseable(String),

    /// Only HTTP/HTTPS is allowed
    #[error("Unsupported URL scheme '{0}'")]
    Scheme(String),

    /// Host is not one of the supported platforms
    #[error("Unsupported host '{0}': paste a TikTok or YouTube link")]
    UnsupportedHost(String),

    /// TikTok links must carry an explicit scheme
    #[error("Please enter a valid TikTok URL")]
    InvalidTikTok(String),

    /// YouTube host but no recognizable video id
    #[error("Please enter a valid YouTube URL")]
    InvalidYouTube(String),
}

/// A validated, normalized source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub platform: Platform,
    pub url: Url,
    /// YouTube video id; `None` for TikTok.
    pub video_id: Option<String>,
}

impl SourceUrl {
    /// Whether the URL is a platform short link that should be expanded first.
    pub fn is_short_link(&self) -> bool {
        self.platform == Platform::TikTok
            && self
                .url
                .host_str()
                .is_some_and(|host| TIKTOK_SHORT_HOSTS.contains(&host))
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Validates raw user input and detects its platform.
///
/// # Examples
/// ```
/// use downloadex::core::types::Platform;
/// use downloadex::core::validation::parse_source_url;
///
/// let tiktok = parse_source_url("https://vm.tiktok.com/ZMabc123/").unwrap();
/// assert_eq!(tiktok.platform, Platform::TikTok);
/// assert!(tiktok.is_short_link());
///
/// let youtube = parse_source_url("youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(youtube.video_id.as_deref(), Some("dQw4w9WgXcQ"));
///
/// assert!(parse_source_url("https://evil.com/video/1").is_err());
/// assert!(parse_source_url("https://tiktok.com.evil.com/").is_err());
/// ```
pub fn parse_source_url(raw: &str) -> Result<SourceUrl, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Unparseable(String::new()));
    }

    let has_scheme = trimmed.contains("://");
    let candidate = if has_scheme {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|_| ValidationError::Unparseable(trimmed.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::Scheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ValidationError::Unparseable(trimmed.to_string()))?
        .to_lowercase();

    if TIKTOK_HOSTS.contains(&host.as_str()) {
        if !has_scheme {
            return Err(ValidationError::InvalidTikTok(trimmed.to_string()));
        }
        return Ok(SourceUrl {
            platform: Platform::TikTok,
            url,
            video_id: None,
        });
    }

    if YOUTUBE_HOSTS.contains(&host.as_str()) || YOUTU_BE_HOSTS.contains(&host.as_str()) {
        let video_id = extract_youtube_id(&url).ok_or_else(|| ValidationError::InvalidYouTube(trimmed.to_string()))?;
        return Ok(SourceUrl {
            platform: Platform::YouTube,
            url,
            video_id: Some(video_id),
        });
    }

    Err(ValidationError::UnsupportedHost(host))
}

/// Extracts the 11-character video id from a YouTube URL.
///
/// Supports `watch?v=`, `embed/`, `v/`, `shorts/` and `youtu.be/` forms, then
/// falls back to any `v` query parameter.
pub fn extract_youtube_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    let from_path = if YOUTU_BE_HOSTS.contains(&host.as_str()) {
        segments.first().copied()
    } else {
        match segments.as_slice() {
            ["embed", id, ..] | ["v", id, ..] | ["shorts", id, ..] | ["live", id, ..] => Some(*id),
            _ => None,
        }
    };

    from_path
        .filter(|id| is_youtube_id(id))
        .map(str::to_string)
        .or_else(|| {
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.to_string())
                .filter(|id| is_youtube_id(id))
        })
}

fn is_youtube_id(candidate: &str) -> bool {
    candidate.len() == YOUTUBE_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Sanitizes a filename by removing filesystem-unsafe characters.
///
/// Removes path separators, reserved characters (`:`, `*`, `?`, `"`, `<`,
/// `>`, `|`) and control characters. Leading dots are trimmed so the result
/// never names a hidden file or a parent directory.
///
/// # Examples
/// ```
/// use downloadex::core::validation::sanitize_filename;
///
/// assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
/// assert_eq!(sanitize_filename("video:file.mp4"), "videofile.mp4");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !['/', '\\', ':', '*', '?', '"', '<', '>', '|'].contains(c))
        .filter(|c| !c.is_control())
        .collect();
    cleaned.trim().trim_start_matches('.').to_string()
}
