//! Metadata provider abstraction layer.
//!
//! Provides the `MetadataProvider` trait for pluggable upstream APIs and a
//! `ProviderRegistry` that keeps them in priority order per platform. New
//! upstreams are added by implementing `MetadataProvider` and listing them
//! in `ProviderKind`.
//!
//! Built-in providers:
//! - `TiklyDownProvider`: TikTok, flat response shape
//! - `TikWmProvider`: TikTok, `{code, msg, data}` envelope
//! - `YouTubeOembedProvider` / `NoembedProvider`: YouTube title/author,
//!   media links from converter mirrors

pub mod tiklydown;
pub mod tikwm;
pub mod youtube;

use crate::core::config;
use crate::core::error::ProviderFailure;
use crate::core::types::{Author, MediaLinks, Platform};
use crate::core::validation::SourceUrl;
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};

pub use tiklydown::TiklyDownProvider;
pub use tikwm::TikWmProvider;
pub use youtube::{NoembedProvider, YouTubeOembedProvider};

/// Fields a provider managed to extract from its payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub title: String,
    pub author: Author,
    pub media: MediaLinks,
    pub stats: Option<serde_json::Value>,
}

/// One upstream metadata API.
///
/// Implementations only build request URLs and map payloads; the resolver
/// owns the HTTP client so every provider shares timeouts and headers.
pub trait MetadataProvider: Send + Sync {
    /// Short stable name (e.g., "tikwm"), used in logs and errors.
    fn name(&self) -> &str;

    /// Platform this provider serves.
    fn platform(&self) -> Platform;

    /// Full GET URL for resolving `source`.
    fn endpoint(&self, source: &SourceUrl) -> String;

    /// Maps a JSON payload into the canonical fields.
    ///
    /// Returns `ProviderFailure::Rejected` when the payload carries the
    /// provider's own failure signal, so the chain moves on.
    fn normalize(&self, source: &SourceUrl, body: &serde_json::Value) -> Result<Normalized, ProviderFailure>;
}

/// Base URLs of every upstream the resolver talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub tiklydown: String,
    pub tikwm: String,
    pub youtube_oembed: String,
    pub noembed: String,
    pub cors_relay: String,
}

impl Endpoints {
    /// Endpoints from `DEX_*_URL` environment variables, public services otherwise.
    pub fn from_env() -> Self {
        Self {
            tiklydown: config::endpoints::TIKLYDOWN.clone(),
            tikwm: config::endpoints::TIKWM.clone(),
            youtube_oembed: config::endpoints::YOUTUBE_OEMBED.clone(),
            noembed: config::endpoints::NOEMBED.clone(),
            cors_relay: config::endpoints::CORS_RELAY.clone(),
        }
    }

    /// Every endpoint on one base URL, laid out like the public services'
    /// paths. Handy for a local mirror or a mock server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            tiklydown: format!("{}/tiklydown/api/download", base),
            tikwm: format!("{}/tikwm/api/", base),
            youtube_oembed: format!("{}/youtube/oembed", base),
            noembed: format!("{}/noembed/embed", base),
            cors_relay: format!("{}/relay/get", base),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Known provider implementations, parseable from config strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    TiklyDown,
    TikWm,
    #[strum(to_string = "oembed", serialize = "youtube_oembed")]
    YouTubeOembed,
    Noembed,
}

impl ProviderKind {
    pub fn platform(&self) -> Platform {
        match self {
            ProviderKind::TiklyDown | ProviderKind::TikWm => Platform::TikTok,
            ProviderKind::YouTubeOembed | ProviderKind::Noembed => Platform::YouTube,
        }
    }

    /// Instantiates the provider against `endpoints`.
    pub fn build(&self, endpoints: &Endpoints) -> Arc<dyn MetadataProvider> {
        match self {
            ProviderKind::TiklyDown => Arc::new(TiklyDownProvider::new(&endpoints.tiklydown)),
            ProviderKind::TikWm => Arc::new(TikWmProvider::new(&endpoints.tikwm)),
            ProviderKind::YouTubeOembed => Arc::new(YouTubeOembedProvider::new(&endpoints.youtube_oembed)),
            ProviderKind::Noembed => Arc::new(NoembedProvider::new(&endpoints.noembed)),
        }
    }
}

/// Parses a comma-separated provider order, skipping unknown names and
/// duplicates.
///
/// # Examples
/// ```
/// use downloadex::resolver::providers::{parse_order, ProviderKind};
///
/// assert_eq!(
///     parse_order("tikwm, TiklyDown, bogus, tikwm"),
///     vec![ProviderKind::TikWm, ProviderKind::TiklyDown]
/// );
/// ```
pub fn parse_order(list: &str) -> Vec<ProviderKind> {
    let mut order = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match ProviderKind::from_str(name) {
            Ok(kind) if !order.contains(&kind) => order.push(kind),
            Ok(_) => {}
            Err(_) => log::warn!("Ignoring unknown metadata provider '{}'", name),
        }
    }
    order
}

/// Priority order per platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrder {
    pub tiktok: Vec<ProviderKind>,
    pub youtube: Vec<ProviderKind>,
}

impl ProviderOrder {
    /// Order from `DEX_TIKTOK_PROVIDERS` / `DEX_YOUTUBE_PROVIDERS`.
    pub fn from_env() -> Self {
        Self {
            tiktok: parse_order(&config::providers::TIKTOK_ORDER),
            youtube: parse_order(&config::providers::YOUTUBE_ORDER),
        }
    }
}

impl Default for ProviderOrder {
    /// TiklyDown first, TikWM second; oEmbed first, noembed second.
    fn default() -> Self {
        Self {
            tiktok: vec![ProviderKind::TiklyDown, ProviderKind::TikWm],
            youtube: vec![ProviderKind::YouTubeOembed, ProviderKind::Noembed],
        }
    }
}

/// Providers in priority order. Lookups keep insertion order.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Register a provider. Providers are tried in insertion order.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) {
        self.providers.push(provider);
    }

    /// Builds the registry for `order`. A kind listed under the wrong
    /// platform is skipped.
    pub fn from_order(endpoints: &Endpoints, order: &ProviderOrder) -> Self {
        let mut registry = Self::new();
        let listed = order
            .tiktok
            .iter()
            .map(|kind| (Platform::TikTok, kind))
            .chain(order.youtube.iter().map(|kind| (Platform::YouTube, kind)));
        for (platform, kind) in listed {
            if kind.platform() != platform {
                log::warn!("Provider '{}' does not serve {}, skipping", kind, platform);
                continue;
            }
            registry.register(kind.build(endpoints));
        }
        registry
    }

    /// Providers serving `platform`, highest priority first.
    pub fn for_platform(&self, platform: Platform) -> Vec<Arc<dyn MetadataProvider>> {
        self.providers
            .iter()
            .filter(|p| p.platform() == platform)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::from_order(&Endpoints::default(), &ProviderOrder::default())
    }
}

/// Appends URL-encoded query parameters to `base`.
pub(crate) fn query_url(base: &str, params: &[(&str, &str)]) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}{}{}", base, separator, query)
}

/// Deserializes a payload, reporting shape mismatches as `Malformed`.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &serde_json::Value) -> Result<T, ProviderFailure> {
    T::deserialize(body).map_err(|e| ProviderFailure::Malformed(e.to_string()))
}
