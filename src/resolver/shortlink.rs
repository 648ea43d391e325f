//! Short-link expansion for `vm.tiktok.com` / `vt.tiktok.com` links.
//!
//! The short URL is fetched through a CORS relay that wraps the page HTML in
//! `{"contents": "..."}`; the full video URL is then scraped from the page.
//! Expansion is best effort: any failure keeps the original link.

use crate::core::error::ProviderFailure;
use crate::core::types::Platform;
use crate::core::validation::{parse_source_url, SourceUrl};
use crate::resolver::providers::query_url;
use lazy_regex::{regex_captures, regex_find, regex_is_match};
use reqwest::Client;
use select::document::Document;
use select::predicate::Name;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RelayResponse {
    contents: Option<String>,
}

pub struct ShortLinkExpander {
    client: Client,
    relay_url: String,
}

impl ShortLinkExpander {
    pub fn new(client: Client, relay_url: &str) -> Self {
        Self {
            client,
            relay_url: relay_url.to_string(),
        }
    }

    /// Expands `source` if it is a short link; returns it unchanged otherwise
    /// or when expansion fails.
    pub async fn expand(&self, source: SourceUrl) -> SourceUrl {
        if !source.is_short_link() {
            return source;
        }

        let html = match self.fetch_page(&source).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Short-link expansion failed for {}: {}", source.as_str(), e);
                return source;
            }
        };

        match find_full_url(&html) {
            Some(expanded) => {
                log::info!("🔗 Expanded {} → {}", source.as_str(), expanded.as_str());
                expanded
            }
            None => {
                log::warn!("No full video URL found behind {}", source.as_str());
                source
            }
        }
    }

    async fn fetch_page(&self, source: &SourceUrl) -> Result<String, ProviderFailure> {
        let endpoint = query_url(&self.relay_url, &[("url", source.as_str())]);
        log::debug!("Relay request: {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderFailure::Status(response.status()));
        }

        let relay: RelayResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::Malformed(e.to_string()))?;

        relay
            .contents
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderFailure::Malformed("relay returned no page contents".to_string()))
    }
}

/// Scrapes the full TikTok video URL out of a page.
///
/// Tries `<link rel="canonical">`, then `<meta property="og:url">`, then a
/// video URL or bare `/video/<id>` anywhere in the markup. A candidate only
/// counts if it is itself a valid, non-short TikTok link.
pub fn find_full_url(html: &str) -> Option<SourceUrl> {
    let document = Document::from(html);

    let canonical = document
        .find(Name("link"))
        .find(|n| {
            n.attr("rel")
                .map(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")))
                .unwrap_or(false)
        })
        .and_then(|n| n.attr("href"))
        .map(str::to_string);

    let og_url = document
        .find(Name("meta"))
        .find(|n| n.attr("property").map(|v| v == "og:url").unwrap_or(false))
        .and_then(|n| n.attr("content"))
        .map(str::to_string);

    [canonical, og_url, video_url_in_text(html)]
        .into_iter()
        .flatten()
        .find_map(|candidate| as_full_tiktok_url(&candidate))
}

/// First `https://www.tiktok.com/@user/video/<digits>` in the text, or a
/// bare `/video/<digits>` rebuilt into one.
fn video_url_in_text(text: &str) -> Option<String> {
    if let Some(url) = regex_find!(r"https://www\.tiktok\.com/@[\w.-]+/video/\d+", text) {
        return Some(url.to_string());
    }
    regex_captures!(r"/video/(\d{6,})", text).map(|(_, id)| format!("https://www.tiktok.com/@/video/{}", id))
}

/// A candidate counts only if it is a non-short TikTok link to a single post.
fn as_full_tiktok_url(candidate: &str) -> Option<SourceUrl> {
    let parsed = parse_source_url(candidate).ok()?;
    if parsed.platform != Platform::TikTok || parsed.is_short_link() {
        return None;
    }
    if !regex_is_match!(r"/(?:video|photo)/\d+", parsed.url.path()) {
        return None;
    }
    Some(parsed)
}
