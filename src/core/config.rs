use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Unset: log to the terminal only
pub static LOG_FILE_PATH: Lazy<Option<String>> =
    Lazy::new(|| env::var("LOG_FILE_PATH").ok().filter(|p| !p.trim().is_empty()));

/// Directory downloaded files are saved into
/// Read from DOWNLOAD_FOLDER environment variable
/// Default: current directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| ".".to_string()));

/// Temporary files directory for staged blobs
/// Read from TEMP_FILES_DIR environment variable
/// Default: the OS temp directory
pub static TEMP_FILES_DIR: Lazy<String> = Lazy::new(|| {
    env::var("TEMP_FILES_DIR").unwrap_or_else(|_| env::temp_dir().to_string_lossy().to_string())
});

/// Disable handing URLs to the system browser
/// Read from DEX_NO_BROWSER (any non-empty value other than "0"/"false")
pub static NO_BROWSER: Lazy<bool> = Lazy::new(|| {
    env::var("DEX_NO_BROWSER")
        .map(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
});

/// Upstream endpoints. Every base URL can be overridden so a self-hosted
/// mirror (or a test server) can stand in for the public service.
pub mod endpoints {
    use super::{env, Lazy};

    /// TiklyDown download API
    /// Read from DEX_TIKLYDOWN_URL
    pub static TIKLYDOWN: Lazy<String> = Lazy::new(|| {
        env::var("DEX_TIKLYDOWN_URL").unwrap_or_else(|_| "https://api.tiklydown.eu.org/api/download".to_string())
    });

    /// TikWM API
    /// Read from DEX_TIKWM_URL
    pub static TIKWM: Lazy<String> =
        Lazy::new(|| env::var("DEX_TIKWM_URL").unwrap_or_else(|_| "https://www.tikwm.com/api/".to_string()));

    /// YouTube oEmbed endpoint
    /// Read from DEX_YOUTUBE_OEMBED_URL
    pub static YOUTUBE_OEMBED: Lazy<String> = Lazy::new(|| {
        env::var("DEX_YOUTUBE_OEMBED_URL").unwrap_or_else(|_| "https://www.youtube.com/oembed".to_string())
    });

    /// noembed.com endpoint
    /// Read from DEX_NOEMBED_URL
    pub static NOEMBED: Lazy<String> =
        Lazy::new(|| env::var("DEX_NOEMBED_URL").unwrap_or_else(|_| "https://noembed.com/embed".to_string()));

    /// CORS relay used to expand short links
    /// Read from DEX_CORS_RELAY_URL
    pub static CORS_RELAY: Lazy<String> =
        Lazy::new(|| env::var("DEX_CORS_RELAY_URL").unwrap_or_else(|_| "https://api.allorigins.win/get".to_string()));
}

/// Provider priority order
pub mod providers {
    use super::{env, Lazy};

    /// Comma-separated TikTok provider order
    /// Read from DEX_TIKTOK_PROVIDERS
    /// Default: tiklydown,tikwm
    pub static TIKTOK_ORDER: Lazy<String> =
        Lazy::new(|| env::var("DEX_TIKTOK_PROVIDERS").unwrap_or_else(|_| "tiklydown,tikwm".to_string()));

    /// Comma-separated YouTube provider order
    /// Read from DEX_YOUTUBE_PROVIDERS
    /// Default: oembed,noembed
    pub static YOUTUBE_ORDER: Lazy<String> =
        Lazy::new(|| env::var("DEX_YOUTUBE_PROVIDERS").unwrap_or_else(|_| "oembed,noembed".to_string()));
}

/// Network configuration
pub mod network {
    use super::{env, Duration, Lazy};

    /// Default timeout for a single upstream request (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;

    /// Connect timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Timeout for media transfers (in seconds)
    pub const MEDIA_TIMEOUT_SECS: u64 = 600;

    /// Browser-like user agent; several upstreams reject unknown clients.
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

    /// Request timeout override
    /// Read from DEX_REQUEST_TIMEOUT_SECS
    pub static REQUEST_TIMEOUT_OVERRIDE: Lazy<Option<u64>> = Lazy::new(|| {
        env::var("DEX_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
    });

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_OVERRIDE.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }

    /// Media transfer timeout duration
    pub fn media_timeout() -> Duration {
        Duration::from_secs(MEDIA_TIMEOUT_SECS)
    }
}

/// Download configuration
pub mod download {
    use super::{env, Lazy};

    /// Default maximum size of a directly fetched file (500 MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

    /// Prefix for suggested filenames
    pub const FILENAME_PREFIX: &str = "DownloadeX";

    /// Maximum file size in bytes
    /// Read from DEX_MAX_FILE_SIZE
    pub static MAX_FILE_SIZE: Lazy<u64> = Lazy::new(|| {
        env::var("DEX_MAX_FILE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE)
    });
}

/// Caption configuration
pub mod caption {
    /// Used when the title is empty after cleaning
    pub const PLACEHOLDER_TITLE: &str = "THE GORGE";

    /// Fixed hashtag block appended after the title
    pub const HASHTAG_BLOCK: &str = "\n        \n#cinesnaps #movierecaps #filmclips #CinemaMagic\n#FlickFix #MovieMoments #scenesnaps #ReelItUp\n#MustWatchScenes #shortrecaps #MovieVibes\n#FilmGeek #movieaddict #BingeWorthy #ClipCulture\n#movieclips #cineedits #CineLovers #plotinminutes\n";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_durations() {
        assert_eq!(network::connect_timeout(), Duration::from_secs(10));
        assert_eq!(network::media_timeout(), Duration::from_secs(600));
        assert!(network::timeout() >= Duration::from_secs(1));
    }

    #[test]
    fn test_hashtag_block_shape() {
        assert!(caption::HASHTAG_BLOCK.starts_with("\n        \n#cinesnaps #movierecaps"));
        assert!(caption::HASHTAG_BLOCK.ends_with("#plotinminutes\n"));
        assert_eq!(caption::HASHTAG_BLOCK.matches('#').count(), 19);
    }
}
