//! Discovery resolution with an init-once barrier.
//!
//! The resolver fetches and parses the vendor's discovery document exactly
//! once per instance. Concurrent early callers all await the single
//! in-flight fetch; a failed fetch or parse leaves the cell unset so a later
//! call can retry independently. The resolved state only exists after a
//! fully successful parse.
//!
//! The resolver is constructed explicitly and injected wherever lookups are
//! needed; there is no process-global instance.

use crate::document::DiscoveryDocument;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::index::{Action, ActionName, DiscoveryIndex};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// Capability for fetching the raw discovery document.
///
/// The production implementation is [`HttpDiscoveryFetcher`]; tests inject
/// counting or failing fakes.
pub trait DiscoveryFetcher: Send + Sync + 'static {
    /// Fetches the discovery document text from `endpoint`.
    fn fetch(&self, endpoint: &Url) -> impl Future<Output = DiscoveryResult<String>> + Send;
}

/// HTTPS discovery fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDiscoveryFetcher {
    client: reqwest::Client,
}

impl HttpDiscoveryFetcher {
    /// Creates a fetcher whose requests are bounded by `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> DiscoveryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| {
                DiscoveryError::unavailable_with_source("failed to construct HTTP client", e)
            })?;
        Ok(Self { client })
    }
}

impl DiscoveryFetcher for HttpDiscoveryFetcher {
    async fn fetch(&self, endpoint: &Url) -> DiscoveryResult<String> {
        let response = self
            .client
            .get(endpoint.clone())
            .header("Accept", "application/xml")
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::unavailable_with_source(
                    format!("fetch of {endpoint} failed"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::unavailable(format!(
                "discovery endpoint answered {status}"
            )));
        }

        response.text().await.map_err(|e| {
            DiscoveryError::unavailable_with_source("failed to read discovery response body", e)
        })
    }
}

/// Resolves and caches the discovery document, exposing extension lookups.
#[derive(Debug)]
pub struct DiscoveryResolver<F> {
    fetcher: F,
    endpoint: Url,
    index: OnceCell<DiscoveryIndex>,
}

impl<F: DiscoveryFetcher> DiscoveryResolver<F> {
    /// Creates a resolver for `endpoint` using the injected fetcher.
    #[must_use]
    pub fn new(fetcher: F, endpoint: Url) -> Self {
        Self {
            fetcher,
            endpoint,
            index: OnceCell::new(),
        }
    }

    /// The configured discovery endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves the discovery document, fetching and parsing it on first
    /// call and returning the cached index afterwards.
    ///
    /// Safe to call from many concurrent callers: the underlying fetch runs
    /// at most once while any successful result is cached.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Unavailable`] on transport failure or non-2xx,
    /// [`DiscoveryError::Malformed`] on parse failure, and
    /// [`DiscoveryError::Cancelled`] when `cancel` fires first. Failures do
    /// not poison the resolver; a later call retries.
    pub async fn resolve(&self, cancel: &CancellationToken) -> DiscoveryResult<&DiscoveryIndex> {
        self.index
            .get_or_try_init(|| self.fetch_and_build(cancel))
            .await
    }

    /// Returns the resolved index without triggering a fetch.
    #[must_use]
    pub fn cached(&self) -> Option<&DiscoveryIndex> {
        self.index.get()
    }

    /// Resolves (if needed) and looks up the view action for `extension`.
    pub async fn find_view(
        &self,
        extension: &str,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Arc<Action>> {
        self.resolve(cancel).await?.find_view(extension)
    }

    /// Resolves (if needed) and looks up the edit action for `extension`.
    pub async fn find_edit(
        &self,
        extension: &str,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Arc<Action>> {
        self.resolve(cancel).await?.find_edit(extension)
    }

    /// Resolves (if needed) and looks up any action by verb and extension.
    pub async fn find_action(
        &self,
        name: &ActionName,
        extension: &str,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Arc<Action>> {
        self.resolve(cancel).await?.find(name, extension)
    }

    async fn fetch_and_build(&self, cancel: &CancellationToken) -> DiscoveryResult<DiscoveryIndex> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(DiscoveryError::Cancelled),
            result = async {
                debug!(endpoint = %self.endpoint, "fetching discovery document");
                let xml = self.fetcher.fetch(&self.endpoint).await?;
                let document = DiscoveryDocument::parse(&xml)?;
                let index = DiscoveryIndex::from_document(&document);
                info!(
                    apps = document.apps.len(),
                    actions = index.len(),
                    "discovery document resolved"
                );
                Ok(index)
            } => result,
        }
    }
}
