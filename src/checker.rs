//! Liveness checking of scraped proxies.
//!
//! A proxy counts as alive when a request routed through it completes at all;
//! the HTTP status of the response is not checked.

use crate::config::ProxyPoolConfig;
use crate::error::ProbeError;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// A single liveness probe through one proxy endpoint.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, endpoint: &str) -> Result<(), ProbeError>;
}

/// Probe that issues one GET to a fixed URL through the proxy under test.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, endpoint: &str) -> Result<(), ProbeError> {
        let proxy = reqwest::Proxy::all(endpoint)
            .map_err(|e| ProbeError::InvalidProxy(endpoint.to_string(), e))?;

        let client = reqwest::Client::builder()
            .proxy(proxy)
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ProbeError::Client(endpoint.to_string(), e))?;

        match client.get(&self.url).send().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout(endpoint.to_string())),
            Err(e) => Err(ProbeError::Transport(endpoint.to_string(), e)),
        }
    }
}

/// Runs probes over a batch of endpoints with bounded concurrency.
#[derive(Clone)]
pub struct LivenessChecker {
    probe: Arc<dyn Probe>,
    max_concurrency: usize,
}

impl LivenessChecker {
    /// Checker using [`HttpProbe`] with the URL, timeout and concurrency from `config`.
    pub fn from_config(config: &ProxyPoolConfig) -> Self {
        let probe = HttpProbe::new(config.check_url.clone(), config.check_timeout);
        Self::with_probe(probe, config.max_concurrent_checks)
    }

    /// Checker using a custom probe.
    pub fn with_probe<P: Probe + 'static>(probe: P, max_concurrency: usize) -> Self {
        Self {
            probe: Arc::new(probe),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Return the endpoints that responded to the probe.
    ///
    /// At most `max_concurrency` probes are in flight at once; the rest queue
    /// for a slot. Output order is unspecified.
    pub async fn test(&self, endpoints: Vec<String>) -> Vec<String> {
        let total = endpoints.len();
        let alive: Vec<String> = stream::iter(endpoints)
            .map(|endpoint| {
                let probe = Arc::clone(&self.probe);
                async move {
                    match probe.probe(&endpoint).await {
                        Ok(()) => Some(endpoint),
                        Err(e) => {
                            debug!("{}", e);
                            None
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrency)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        info!("Liveness check completed: {}/{} alive", alive.len(), total);
        alive
    }
}
