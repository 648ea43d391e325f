//! Fixtures for integration tests
//!
//! Every upstream is served by one wiremock server; `Endpoints::with_base`
//! lays the provider paths out under it:
//! - `/tiklydown/api/download`
//! - `/tikwm/api/`
//! - `/youtube/oembed`, `/noembed/embed`
//! - `/relay/get`

#![allow(dead_code)]

use downloadex::download::LocalSurfaceOptions;
use downloadex::resolver::providers::{Endpoints, ProviderOrder};
use downloadex::resolver::Resolver;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::MockServer;

pub const VIDEO_URL: &str = "https://www.tiktok.com/@scout2015/video/6718335390845095173";
pub const SHORT_URL: &str = "https://vm.tiktok.com/ZMabc123/";

/// Resolver with the default provider order against `server`.
pub fn resolver_for(server: &MockServer) -> Resolver {
    resolver_with_order(server, ProviderOrder::default())
}

pub fn resolver_with_order(server: &MockServer, order: ProviderOrder) -> Resolver {
    Resolver::new(Endpoints::with_base(&server.uri()), order).expect("Failed to build resolver")
}

/// Surface options writing into `output` and staging into `temp`, browser off.
pub fn surface_options(output: &Path, temp: &Path) -> LocalSurfaceOptions {
    LocalSurfaceOptions {
        output_dir: output.to_path_buf(),
        temp_dir: temp.to_path_buf(),
        max_file_size: 1024 * 1024,
        open_browser: false,
    }
}

/// A successful TiklyDown response.
pub fn tiklydown_payload(play_url: &str) -> Value {
    json!({
        "id": 6718335390845095173u64,
        "title": "Epic Fail! #funny @friend",
        "author": {"nickname": "Scout & Suki", "unique_id": "scout2015"},
        "video": {
            "noWatermark": play_url,
            "watermark": "https://cdn.test/wm.mp4",
            "cover": "https://cdn.test/cover.jpg"
        },
        "music": {"play_url": "https://cdn.test/music.mp3"},
        "stats": {"likeCount": 12}
    })
}

/// A successful TikWM response.
pub fn tikwm_payload(play_url: &str) -> Value {
    json!({
        "code": 0,
        "msg": "success",
        "data": {
            "title": "Epic Fail! #funny",
            "play": play_url,
            "wmplay": "https://cdn.test/wmplay.mp4",
            "cover": "https://cdn.test/cover.jpeg",
            "music": "https://cdn.test/music.mp3",
            "play_count": 1000,
            "author": {"unique_id": "epicfails", "nickname": "Epic Fails"}
        }
    })
}
