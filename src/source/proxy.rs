//! Fetching feed documents through a read-through CORS proxy.
//!
//! Every request goes to `{proxy}/get?url=<feed>&disableCache=true`.  The
//! proxy answers with a JSON envelope whose `contents` field holds the raw
//! document text.
//!
//! All failures (connection, DNS, non-2xx status, an envelope that is not
//! JSON) collapse into one [`NetworkError`]: callers cannot tell the proxy
//! apart from the origin, and do not need to.  There is no retry here; the
//! next polling cycle is the retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::FeedFetcher;
use crate::error::NetworkError;

/// The proxy used when none is configured.
pub const DEFAULT_PROXY: &str = "https://allorigins.hexlet.app";

/// Time allowed to establish a connection to the proxy.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for proxy requests.
const USER_AGENT: &str = concat!("livescroll-reader/", env!("CARGO_PKG_VERSION"));

/// The JSON body returned by the proxy.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    contents: Option<String>,
}

/// A [`FeedFetcher`] that routes every request through the proxy.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: Client,
    /// `{proxy}/get`, without query parameters.
    endpoint: Url,
}

impl ProxyFetcher {
    /// Build a fetcher for the proxy at `proxy` (e.g.
    /// `https://allorigins.hexlet.app`).
    pub fn new(proxy: &Url) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        let endpoint = proxy.join("/get")?;
        Ok(Self { client, endpoint })
    }

    /// The proxy URL that fetches `url` with caching disabled.
    pub fn proxied_url(&self, url: &str) -> Url {
        let mut proxied = self.endpoint.clone();
        proxied
            .query_pairs_mut()
            .append_pair("url", url)
            .append_pair("disableCache", "true");
        proxied
    }
}

#[async_trait]
impl FeedFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        let proxied = self.proxied_url(url);
        debug!(%url, "fetching through proxy");

        let response = self
            .client
            .get(proxied)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NetworkError(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| NetworkError(format!("failed to read response: {e}")))?;

        decode_envelope(&body)
    }
}

/// Pull the document text out of a proxy response body.
///
/// A missing or `null` `contents` yields an empty document, which the parser
/// then rejects; a body that is not a JSON envelope is a [`NetworkError`].
pub fn decode_envelope(body: &str) -> Result<String, NetworkError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| NetworkError(format!("malformed proxy response: {e}")))?;
    Ok(envelope.contents.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
