//! TiklyDown: free TikTok download API with a flat response shape.
//!
//! `GET <base>?url=<encoded>` returns
//! `{title, author: {nickname, unique_id}, video: {noWatermark, watermark, cover}, music, stats}`.
//! A payload without a `video` object means the API could not resolve the link.

use super::{decode, query_url, MetadataProvider, Normalized};
use crate::core::error::ProviderFailure;
use crate::core::types::{non_empty, Author, MediaLinks, Platform};
use crate::core::validation::SourceUrl;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Payload {
    title: Option<String>,
    author: Option<PayloadAuthor>,
    video: Option<PayloadVideo>,
    music: Option<Value>,
    stats: Option<Value>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayloadAuthor {
    nickname: Option<String>,
    unique_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayloadVideo {
    #[serde(rename = "noWatermark")]
    no_watermark: Option<String>,
    watermark: Option<String>,
    cover: Option<String>,
}

pub struct TiklyDownProvider {
    base_url: String,
}

impl TiklyDownProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

/// `music` is an object with `play_url` in current responses, a bare URL in older ones.
fn music_url(music: Option<Value>) -> Option<String> {
    match music? {
        Value::String(url) => non_empty(Some(url)),
        Value::Object(map) => non_empty(map.get("play_url").and_then(Value::as_str).map(str::to_string)),
        _ => None,
    }
}

impl MetadataProvider for TiklyDownProvider {
    fn name(&self) -> &str {
        "tiklydown"
    }

    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn endpoint(&self, source: &SourceUrl) -> String {
        query_url(&self.base_url, &[("url", source.as_str())])
    }

    fn normalize(&self, _source: &SourceUrl, body: &Value) -> Result<Normalized, ProviderFailure> {
        let payload: Payload = decode(body)?;

        let Some(video) = payload.video else {
            return Err(ProviderFailure::Rejected(
                payload.message.unwrap_or_else(|| "No video data found".to_string()),
            ));
        };

        let author = payload
            .author
            .map(|a| Author {
                display_name: non_empty(a.nickname),
                handle: non_empty(a.unique_id),
            })
            .unwrap_or_default();

        Ok(Normalized {
            title: payload.title.unwrap_or_default().trim().to_string(),
            author,
            media: MediaLinks {
                no_watermark_url: non_empty(video.no_watermark),
                watermark_url: non_empty(video.watermark),
                cover_url: non_empty(video.cover),
                audio_url: music_url(payload.music),
            },
            stats: payload.stats.filter(|s| !s.is_null()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::parse_source_url;
    use serde_json::json;

    fn source() -> SourceUrl {
        parse_source_url("https://www.tiktok.com/@scout2015/video/6718335390845095173").unwrap()
    }

    #[test]
    fn test_endpoint() {
        let provider = TiklyDownProvider::new("https://api.tiklydown.eu.org/api/download");
        assert_eq!(
            provider.endpoint(&source()),
            "https://api.tiklydown.eu.org/api/download?url=https%3A%2F%2Fwww.tiktok.com%2F%40scout2015%2Fvideo%2F6718335390845095173"
        );
    }

    #[test]
    fn test_normalize_full_payload() {
        let body = json!({
            "id": 6718335390845095173u64,
            "title": "Scramble up ur name & I'll try to guess it #foryoupage",
            "author": {"nickname": "Scout & Suki", "unique_id": "scout2015"},
            "video": {
                "noWatermark": "https://cdn.test/nowm.mp4",
                "watermark": "https://cdn.test/wm.mp4",
                "cover": "https://cdn.test/cover.jpg"
            },
            "music": {"play_url": "https://cdn.test/music.mp3"},
            "stats": {"likeCount": 12, "playCount": 99}
        });
        let normalized = TiklyDownProvider::new("x").normalize(&source(), &body).unwrap();

        assert_eq!(normalized.title, "Scramble up ur name & I'll try to guess it #foryoupage");
        assert_eq!(normalized.author.handle.as_deref(), Some("scout2015"));
        assert_eq!(normalized.author.display_name.as_deref(), Some("Scout & Suki"));
        assert_eq!(normalized.media.no_watermark_url.as_deref(), Some("https://cdn.test/nowm.mp4"));
        assert_eq!(normalized.media.watermark_url.as_deref(), Some("https://cdn.test/wm.mp4"));
        assert_eq!(normalized.media.cover_url.as_deref(), Some("https://cdn.test/cover.jpg"));
        assert_eq!(normalized.media.audio_url.as_deref(), Some("https://cdn.test/music.mp3"));
        assert_eq!(normalized.stats, Some(json!({"likeCount": 12, "playCount": 99})));
    }

    #[test]
    fn test_missing_video_is_rejected() {
        let body = json!({"status": 400, "message": "Invalid url"});
        let err = TiklyDownProvider::new("x").normalize(&source(), &body).unwrap_err();
        assert!(matches!(err, ProviderFailure::Rejected(msg) if msg == "Invalid url"));
    }

    #[test]
    fn test_empty_links_become_absent() {
        let body = json!({"title": "", "video": {"noWatermark": "", "watermark": "  "}});
        let normalized = TiklyDownProvider::new("x").normalize(&source(), &body).unwrap();
        assert!(!normalized.media.has_video());
        assert_eq!(normalized.author, Author::default());
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let body = json!({"video": "not-an-object"});
        let err = TiklyDownProvider::new("x").normalize(&source(), &body).unwrap_err();
        assert!(matches!(err, ProviderFailure::Malformed(_)));

        let err = TiklyDownProvider::new("x").normalize(&source(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, ProviderFailure::Malformed(_)));
    }

    #[test]
    fn test_music_as_plain_string() {
        assert_eq!(
            music_url(Some(json!("https://cdn.test/a.mp3"))),
            Some("https://cdn.test/a.mp3".to_string())
        );
        assert_eq!(music_url(Some(json!(42))), None);
    }
}
