//! Proxy sources and the registry they are looked up in.

use crate::config::ProxyPoolConfig;
use crate::error::SourceError;
use crate::sources;

use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A named routine that lists proxy endpoints in `scheme://host:port` form.
#[async_trait]
pub trait Source: Send + Sync {
    /// Retrieve the current list of proxies.
    async fn fetch(&self) -> anyhow::Result<Vec<String>>;
}

/// A [`Source`] backed by an async closure.
pub struct FnSource<F>(F);

/// Wrap an async closure so it can be registered as a [`Source`].
///
/// ```
/// use free_proxy_pool::{from_fn, SourceRegistry};
///
/// let registry = SourceRegistry::new()
///     .register("static", from_fn(|| async { Ok::<_, anyhow::Error>(vec!["http://10.0.0.1:8080".to_string()]) }));
/// assert!(registry.contains("static"));
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<String>>> + Send,
{
    FnSource(f)
}

#[async_trait]
impl<F, Fut> Source for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<String>>> + Send,
{
    async fn fetch(&self) -> anyhow::Result<Vec<String>> {
        (self.0)().await
    }
}

/// Catalog of sources addressable by name.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in site scraper, sharing one HTTP client.
    pub fn builtin(config: &ProxyPoolConfig) -> Result<Self, reqwest::Error> {
        let client = sources::new_client(config)?;
        Ok(sources::register_all(Self::new(), &client))
    }

    /// Add a source, replacing any source already registered under `name`.
    pub fn register<S: Source + 'static>(mut self, name: impl Into<String>, source: S) -> Self {
        self.sources.insert(name.into(), Arc::new(source));
        self
    }

    /// Names of all registered sources, in lexical order.
    pub fn list_sources(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Run the named source.
    pub async fn invoke(&self, name: &str) -> Result<Vec<String>, SourceError> {
        let source = self
            .get(name)
            .ok_or_else(|| SourceError::new(name, anyhow!("source is not registered")))?;
        source
            .fetch()
            .await
            .map_err(|cause| SourceError::new(name, cause))
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
