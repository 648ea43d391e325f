//! URL resolution: validation, short-link expansion and the provider chain.
//!
//! `Resolver::resolve` turns raw user input into one canonical
//! [`VideoMetadata`]. Providers for the detected platform are queried in
//! priority order; the first one that accepts the URL wins.

pub mod providers;
pub mod shortlink;

use crate::core::config;
use crate::core::error::{AppError, AppResult, ProviderAttempt, ProviderFailure};
use crate::core::types::VideoMetadata;
use crate::core::validation::{parse_source_url, SourceUrl};
use providers::{Endpoints, MetadataProvider, Normalized, ProviderOrder, ProviderRegistry};
use reqwest::Client;
use shortlink::ShortLinkExpander;

pub struct Resolver {
    client: Client,
    registry: ProviderRegistry,
    expander: ShortLinkExpander,
}

/// Shared HTTP client for metadata requests.
pub fn build_client() -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(config::network::USER_AGENT)
        .timeout(config::network::timeout())
        .connect_timeout(config::network::connect_timeout())
        .build()?;
    Ok(client)
}

impl Resolver {
    pub fn new(endpoints: Endpoints, order: ProviderOrder) -> AppResult<Self> {
        let client = build_client()?;
        let registry = ProviderRegistry::from_order(&endpoints, &order);
        Ok(Self::with_registry(client, registry, &endpoints.cors_relay))
    }

    /// Resolver configured from the environment.
    pub fn from_env() -> AppResult<Self> {
        Self::new(Endpoints::from_env(), ProviderOrder::from_env())
    }

    /// Resolver over an explicit registry, for custom provider sets.
    pub fn with_registry(client: Client, registry: ProviderRegistry, relay_url: &str) -> Self {
        let expander = ShortLinkExpander::new(client.clone(), relay_url);
        Self {
            client,
            registry,
            expander,
        }
    }

    /// Resolves `raw_url` into canonical metadata.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` when the input is not a supported link (no network I/O)
    /// - `Upstream` when every provider for the platform failed
    /// - `EmptyResult` when the winning provider returned no video link
    pub async fn resolve(&self, raw_url: &str) -> AppResult<VideoMetadata> {
        let source = parse_source_url(raw_url)?;
        log::info!("🔍 Resolving {} URL: {}", source.platform, source.as_str());

        let source = self.expander.expand(source).await;

        let providers = self.registry.for_platform(source.platform);
        let mut attempts = Vec::with_capacity(providers.len());

        for provider in providers {
            match self.query_provider(provider.as_ref(), &source).await {
                Ok(normalized) => {
                    log::info!("✅ {} answered for {}", provider.name(), source.as_str());
                    return into_metadata(provider.name(), &source, normalized);
                }
                Err(failure) => {
                    log::warn!("Provider {} failed: {}", provider.name(), failure);
                    attempts.push(ProviderAttempt {
                        provider: provider.name().to_string(),
                        failure,
                    });
                }
            }
        }

        log::error!("❌ All {} providers failed for {}", attempts.len(), source.as_str());
        Err(AppError::Upstream { attempts })
    }

    async fn query_provider(
        &self,
        provider: &dyn MetadataProvider,
        source: &SourceUrl,
    ) -> Result<Normalized, ProviderFailure> {
        let endpoint = provider.endpoint(source);
        log::debug!("{} → GET {}", provider.name(), endpoint);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderFailure::Status(status));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ProviderFailure::Malformed(e.to_string()))?;

        provider.normalize(source, &body)
    }
}

fn into_metadata(provider: &str, source: &SourceUrl, normalized: Normalized) -> AppResult<VideoMetadata> {
    if !normalized.media.has_video() {
        return Err(AppError::EmptyResult(format!("{} returned no video link", provider)));
    }
    Ok(VideoMetadata {
        platform: source.platform,
        source_url: source.as_str().to_string(),
        provider: provider.to_string(),
        title: normalized.title,
        author: normalized.author,
        media: normalized.media,
        stats: normalized.stats,
    })
}
