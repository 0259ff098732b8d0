//! Configuration for the proxy pool.

use std::time::Duration;

/// Default URL the liveness probe is routed to.
pub const DEFAULT_CHECK_URL: &str = "http://www.google.com";

/// Default user agent for the built-in scrapers.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the proxy pool.
#[derive(Debug, Clone)]
pub struct ProxyPoolConfig {
    /// Whether scraped proxies are also passed through the liveness checker.
    pub test: bool,
    /// URL requested through each proxy during the liveness check.
    pub check_url: String,
    /// Timeout for a single liveness probe.
    pub check_timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub max_concurrent_checks: usize,
    /// Optional deadline for a single source; stragglers are abandoned.
    pub source_timeout: Option<Duration>,
    /// Timeout for each HTTP request made by the built-in scrapers.
    pub request_timeout: Duration,
    /// User agent sent by the built-in scrapers.
    pub user_agent: String,
}

impl ProxyPoolConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProxyPoolConfigBuilder {
        ProxyPoolConfigBuilder::new()
    }
}

impl Default for ProxyPoolConfig {
    fn default() -> Self {
        ProxyPoolConfigBuilder::new().build()
    }
}

/// Builder for `ProxyPoolConfig`.
pub struct ProxyPoolConfigBuilder {
    test: Option<bool>,
    check_url: Option<String>,
    check_timeout: Option<Duration>,
    max_concurrent_checks: Option<usize>,
    source_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ProxyPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            test: None,
            check_url: None,
            check_timeout: None,
            max_concurrent_checks: None,
            source_timeout: None,
            request_timeout: None,
            user_agent: None,
        }
    }

    /// Enable or disable liveness testing of scraped proxies.
    pub fn test(mut self, enabled: bool) -> Self {
        self.test = Some(enabled);
        self
    }

    /// Set the URL requested through each proxy during the liveness check.
    pub fn check_url(mut self, url: impl Into<String>) -> Self {
        self.check_url = Some(url.into());
        self
    }

    /// Set the timeout for a single liveness probe.
    pub fn check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of probes in flight at once.
    pub fn max_concurrent_checks(mut self, count: usize) -> Self {
        self.max_concurrent_checks = Some(count);
        self
    }

    /// Set a deadline for each source.
    pub fn source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    /// Set the timeout for requests made by the built-in scrapers.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the user agent sent by the built-in scrapers.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ProxyPoolConfig {
        ProxyPoolConfig {
            test: self.test.unwrap_or(false),
            check_url: self.check_url.unwrap_or_else(|| DEFAULT_CHECK_URL.to_string()),
            check_timeout: self.check_timeout.unwrap_or(Duration::from_secs(1)),
            max_concurrent_checks: self.max_concurrent_checks.unwrap_or(10).max(1),
            source_timeout: self.source_timeout,
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(10)),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl Default for ProxyPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
