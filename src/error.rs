//! Error types for the free-proxy-pool crate.

use thiserror::Error;

/// Error returned when a single source fails to produce its proxy list.
///
/// Workers swallow this error; it only surfaces through [`crate::RunReport`]
/// and through direct calls to [`crate::SourceRegistry::invoke`].
#[derive(Debug, Error)]
#[error("source `{name}` failed: {cause:#}")]
pub struct SourceError {
    /// Name the source is registered under.
    pub name: String,
    /// Underlying failure (network error, unexpected markup, ...).
    #[source]
    pub cause: anyhow::Error,
}

impl SourceError {
    pub(crate) fn new(name: impl Into<String>, cause: anyhow::Error) -> Self {
        Self {
            name: name.into(),
            cause,
        }
    }
}

/// Error returned when a liveness probe through one endpoint fails.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The endpoint could not be turned into a proxy specification.
    #[error("invalid proxy `{0}`")]
    InvalidProxy(String, #[source] reqwest::Error),
    /// The HTTP client routed through the endpoint could not be built.
    #[error("cannot build client for `{0}`")]
    Client(String, #[source] reqwest::Error),
    /// Connection refused, DNS failure or any other transport failure.
    #[error("probe through `{0}` failed")]
    Transport(String, #[source] reqwest::Error),
    /// The probe did not complete within the configured timeout.
    #[error("probe through `{0}` timed out")]
    Timeout(String),
}

/// Errors surfaced to callers of the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Tested proxies were requested from a pool built without testing.
    #[error("pool was created without liveness testing, tested proxies are unavailable")]
    NotTested,
    /// A requested source is not present in the registry.
    #[error("unknown proxy source `{0}`")]
    UnknownSource(String),
    /// The pool was started outside of a tokio runtime.
    #[error("proxy pool must be started from within a tokio runtime")]
    NoRuntime,
    /// The blocking pool could not start its runtime.
    #[error("cannot start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
