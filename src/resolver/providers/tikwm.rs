//! TikWM: free TikTok API wrapping results in `{code, msg, data}`.
//!
//! `code == 0` is success; anything else is a failure described by `msg`.
//! Media links are sometimes returned relative to the API host.

use super::{decode, query_url, MetadataProvider, Normalized};
use crate::core::error::ProviderFailure;
use crate::core::types::{non_empty, Author, MediaLinks, Platform};
use crate::core::validation::SourceUrl;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

#[derive(Debug, Deserialize)]
struct Envelope {
    code: Option<i64>,
    msg: Option<String>,
    data: Option<Data>,
}

#[derive(Debug, Default, Deserialize)]
struct Data {
    title: Option<String>,
    play: Option<String>,
    wmplay: Option<String>,
    cover: Option<String>,
    origin_cover: Option<String>,
    music: Option<Value>,
    author: Option<DataAuthor>,
    stats: Option<Value>,
    play_count: Option<u64>,
    digg_count: Option<u64>,
    comment_count: Option<u64>,
    share_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DataAuthor {
    nickname: Option<String>,
    unique_id: Option<String>,
}

pub struct TikWmProvider {
    base_url: String,
}

impl TikWmProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Resolves links like `/video/media/play/123.mp4` against the API origin.
    fn absolutize(&self, link: Option<String>) -> Option<String> {
        let link = non_empty(link)?;
        if link.starts_with("http://") || link.starts_with("https://") {
            return Some(link);
        }
        match Url::parse(&self.base_url).and_then(|base| base.join(&link)) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                log::debug!("tikwm: cannot absolutize '{}': {}", link, e);
                None
            }
        }
    }
}

/// `stats` when present, otherwise the flat counters folded into one object.
fn collect_stats(data: &mut Data) -> Option<Value> {
    if let Some(stats) = data.stats.take().filter(|s| !s.is_null()) {
        return Some(stats);
    }
    let counters = [
        ("play_count", data.play_count),
        ("digg_count", data.digg_count),
        ("comment_count", data.comment_count),
        ("share_count", data.share_count),
    ];
    if counters.iter().all(|(_, v)| v.is_none()) {
        return None;
    }
    let mut map = serde_json::Map::new();
    for (key, value) in counters {
        if let Some(value) = value {
            map.insert(key.to_string(), json!(value));
        }
    }
    Some(Value::Object(map))
}

impl MetadataProvider for TikWmProvider {
    fn name(&self) -> &str {
        "tikwm"
    }

    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn endpoint(&self, source: &SourceUrl) -> String {
        query_url(&self.base_url, &[("url", source.as_str())])
    }

    fn normalize(&self, _source: &SourceUrl, body: &Value) -> Result<Normalized, ProviderFailure> {
        let envelope: Envelope = decode(body)?;

        match envelope.code {
            Some(0) => {}
            Some(code) => {
                return Err(ProviderFailure::Rejected(
                    envelope
                        .msg
                        .unwrap_or_else(|| format!("Failed to fetch video data (code {})", code)),
                ))
            }
            None => return Err(ProviderFailure::Rejected("Response carries no status code".to_string())),
        }

        let mut data = envelope.data.unwrap_or_default();
        let stats = collect_stats(&mut data);

        let audio_url = match data.music.take() {
            Some(Value::String(url)) => self.absolutize(Some(url)),
            Some(Value::Object(map)) => self.absolutize(map.get("play").and_then(Value::as_str).map(str::to_string)),
            _ => None,
        };

        let author = data
            .author
            .take()
            .map(|a| Author {
                display_name: non_empty(a.nickname),
                handle: non_empty(a.unique_id),
            })
            .unwrap_or_default();

        Ok(Normalized {
            title: data.title.take().unwrap_or_default().trim().to_string(),
            author,
            media: MediaLinks {
                no_watermark_url: self.absolutize(data.play.take()),
                watermark_url: self.absolutize(data.wmplay.take()),
                cover_url: self.absolutize(data.cover.take().or(data.origin_cover.take())),
                audio_url,
            },
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::parse_source_url;
    use pretty_assertions::assert_eq;

    fn source() -> SourceUrl {
        parse_source_url("https://vm.tiktok.com/ZMabc123/").unwrap()
    }

    fn provider() -> TikWmProvider {
        TikWmProvider::new("https://www.tikwm.com/api/")
    }

    #[test]
    fn test_normalize_success() {
        let body = json!({
            "code": 0,
            "msg": "success",
            "processed_time": 0.1,
            "data": {
                "id": "7234567890123456789",
                "title": "Epic Fail! #funny",
                "cover": "https://cdn.test/cover.jpeg",
                "play": "https://cdn.test/play.mp4",
                "wmplay": "https://cdn.test/wmplay.mp4",
                "music": "https://cdn.test/music.mp3",
                "play_count": 1000,
                "digg_count": 50,
                "author": {"id": "1", "unique_id": "epicfails", "nickname": "Epic Fails"}
            }
        });
        let normalized = provider().normalize(&source(), &body).unwrap();

        assert_eq!(normalized.title, "Epic Fail! #funny");
        assert_eq!(
            normalized.author,
            Author {
                display_name: Some("Epic Fails".to_string()),
                handle: Some("epicfails".to_string()),
            }
        );
        assert_eq!(normalized.media.no_watermark_url.as_deref(), Some("https://cdn.test/play.mp4"));
        assert_eq!(normalized.media.watermark_url.as_deref(), Some("https://cdn.test/wmplay.mp4"));
        assert_eq!(normalized.media.audio_url.as_deref(), Some("https://cdn.test/music.mp3"));
        assert_eq!(normalized.stats, Some(json!({"play_count": 1000, "digg_count": 50})));
    }

    #[test]
    fn test_nonzero_code_is_rejected_with_message() {
        let body = json!({"code": -1, "msg": "Url parsing is failed! Please check url."});
        let err = provider().normalize(&source(), &body).unwrap_err();
        assert!(matches!(err, ProviderFailure::Rejected(msg) if msg.starts_with("Url parsing is failed")));
    }

    #[test]
    fn test_nonzero_code_without_message() {
        let err = provider().normalize(&source(), &json!({"code": 7})).unwrap_err();
        assert!(matches!(err, ProviderFailure::Rejected(msg) if msg.contains("code 7")));
    }

    #[test]
    fn test_missing_code_is_rejected() {
        let err = provider().normalize(&source(), &json!({"data": {}})).unwrap_err();
        assert!(matches!(err, ProviderFailure::Rejected(_)));
    }

    #[test]
    fn test_success_without_data_has_no_media() {
        let normalized = provider().normalize(&source(), &json!({"code": 0})).unwrap();
        assert!(!normalized.media.has_video());
        assert_eq!(normalized.stats, None);
    }

    #[test]
    fn test_relative_links_are_absolutized() {
        let body = json!({
            "code": 0,
            "data": {"play": "/video/media/play/7234.mp4", "cover": "/video/cover/7234.webp"}
        });
        let normalized = provider().normalize(&source(), &body).unwrap();
        assert_eq!(
            normalized.media.no_watermark_url.as_deref(),
            Some("https://www.tikwm.com/video/media/play/7234.mp4")
        );
        assert_eq!(
            normalized.media.cover_url.as_deref(),
            Some("https://www.tikwm.com/video/cover/7234.webp")
        );
    }

    #[test]
    fn test_explicit_stats_object_wins() {
        let body = json!({"code": 0, "data": {"stats": {"likes": 3}, "play_count": 9}});
        let normalized = provider().normalize(&source(), &body).unwrap();
        assert_eq!(normalized.stats, Some(json!({"likes": 3})));
    }
}
