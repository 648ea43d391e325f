//! Canonical data model shared by the resolver, caption generator and downloader.

use serde::Serialize;
use strum::{Display, EnumString};

/// Video platform a source URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    #[strum(to_string = "TikTok")]
    TikTok,
    #[strum(to_string = "YouTube")]
    YouTube,
}

/// What the user wants to keep from a resolved video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum MediaFormat {
    #[default]
    #[strum(to_string = "video", serialize = "mp4")]
    Video,
    #[strum(to_string = "audio", serialize = "mp3", serialize = "audio_only")]
    AudioOnly,
}

impl MediaFormat {
    /// File extension used for suggested filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Video => "mp4",
            MediaFormat::AudioOnly => "mp3",
        }
    }
}

/// Uploader of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub display_name: Option<String>,
    pub handle: Option<String>,
}

impl Author {
    /// `@handle`, falling back to the display name, then to `Unknown`.
    pub fn label(&self) -> String {
        let name = self
            .handle
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or("Unknown");
        format!("@{}", name)
    }
}

/// Media links returned by an upstream API. Every field is optional;
/// absent links are `None`, never empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaLinks {
    pub no_watermark_url: Option<String>,
    pub watermark_url: Option<String>,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
}

impl MediaLinks {
    /// Whether at least one video variant is available.
    pub fn has_video(&self) -> bool {
        self.no_watermark_url.is_some() || self.watermark_url.is_some()
    }

    /// Best link to preview the video with.
    pub fn preview_url(&self) -> Option<&str> {
        self.no_watermark_url.as_deref().or(self.watermark_url.as_deref())
    }
}

/// Canonical metadata record, normalized from whichever upstream answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub platform: Platform,
    /// URL the record was resolved from, after short-link expansion.
    pub source_url: String,
    /// Name of the provider that produced this record.
    pub provider: String,
    pub title: String,
    pub author: Author,
    pub media: MediaLinks,
    /// Opaque engagement counters as the upstream reported them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<serde_json::Value>,
}

impl VideoMetadata {
    /// Display title, with the platform-specific placeholder for untitled videos.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("{} Video", self.platform)
        } else {
            self.title.clone()
        }
    }

    /// Picks the link to download for `format`.
    ///
    /// Video prefers the watermark-free variant; the watermarked one is only
    /// returned when `allow_watermark` is set.
    pub fn select_media(&self, format: MediaFormat, allow_watermark: bool) -> Option<&str> {
        match format {
            MediaFormat::Video => self.media.no_watermark_url.as_deref().or_else(|| {
                if allow_watermark {
                    self.media.watermark_url.as_deref()
                } else {
                    None
                }
            }),
            MediaFormat::AudioOnly => self.media.audio_url.as_deref(),
        }
    }
}

/// Third-party page that can fetch the media when a direct download is not possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorLink {
    pub label: String,
    pub url: String,
}

impl MirrorLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Turns an upstream string into an optional link, treating blanks as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VideoMetadata {
        VideoMetadata {
            platform: Platform::TikTok,
            source_url: "https://www.tiktok.com/@user/video/1".to_string(),
            provider: "tikwm".to_string(),
            title: String::new(),
            author: Author::default(),
            media: MediaLinks {
                no_watermark_url: None,
                watermark_url: Some("https://cdn.example.com/wm.mp4".to_string()),
                cover_url: None,
                audio_url: Some("https://cdn.example.com/a.mp3".to_string()),
            },
            stats: None,
        }
    }

    #[test]
    fn test_media_format_parsing() {
        assert_eq!("video".parse::<MediaFormat>().unwrap(), MediaFormat::Video);
        assert_eq!("MP4".parse::<MediaFormat>().unwrap(), MediaFormat::Video);
        assert_eq!("mp3".parse::<MediaFormat>().unwrap(), MediaFormat::AudioOnly);
        assert_eq!("audio".parse::<MediaFormat>().unwrap(), MediaFormat::AudioOnly);
        assert!("flac".parse::<MediaFormat>().is_err());
    }

    #[test]
    fn test_select_media_respects_watermark_choice() {
        let meta = sample();
        assert_eq!(meta.select_media(MediaFormat::Video, false), None);
        assert_eq!(
            meta.select_media(MediaFormat::Video, true),
            Some("https://cdn.example.com/wm.mp4")
        );
        assert_eq!(
            meta.select_media(MediaFormat::AudioOnly, false),
            Some("https://cdn.example.com/a.mp3")
        );
    }

    #[test]
    fn test_author_label_fallbacks() {
        let author = Author {
            display_name: Some("Display".to_string()),
            handle: None,
        };
        assert_eq!(author.label(), "@Display");
        assert_eq!(Author::default().label(), "@Unknown");
    }

    #[test]
    fn test_display_title_placeholder() {
        assert_eq!(sample().display_title(), "TikTok Video");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" x ".to_string())), Some("x".to_string()));
    }
}
