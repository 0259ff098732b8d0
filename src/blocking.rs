//! A blocking proxy pool.
//!
//! [`ProxyGet`] owns its own tokio runtime, so it can be used from ordinary
//! synchronous code. It must not be created, waited on, or dropped from
//! within an async context.

use crate::config::ProxyPoolConfig;
use crate::error::PoolError;
use crate::pool::ProxyPool;
use crate::report::RunReport;
use crate::source::SourceRegistry;

use tokio::runtime::{Builder, Runtime};

/// Blocking wrapper around [`ProxyPool`].
pub struct ProxyGet {
    pool: ProxyPool,
    registered: Vec<String>,
    runtime: Runtime,
}

impl ProxyGet {
    /// Start querying `sources` (every registered source when empty).
    pub fn new<I, S>(
        registry: &SourceRegistry,
        sources: I,
        config: &ProxyPoolConfig,
    ) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let runtime = Builder::new_multi_thread().enable_all().build()?;
        let pool = {
            let _guard = runtime.enter();
            ProxyPool::spawn(registry, sources, config)?
        };
        Ok(Self {
            pool,
            registered: registry.list_sources(),
            runtime,
        })
    }

    /// Block the calling thread until every source has finished.
    pub fn wait(&self) {
        self.runtime.block_on(self.pool.wait());
    }

    /// See [`ProxyPool::get`].
    pub fn get(&self, n: Option<usize>, tested: bool) -> Result<Vec<String>, PoolError> {
        self.pool.get(n, tested)
    }

    pub fn report(&self) -> Option<RunReport> {
        self.pool.report()
    }

    pub fn is_finished(&self) -> bool {
        self.pool.is_finished()
    }

    /// Names of every source in the registry this pool was built from.
    pub fn list_sources(&self) -> &[String] {
        &self.registered
    }

    /// Names of the sources this run queries.
    pub fn sources(&self) -> &[String] {
        self.pool.sources()
    }
}

/// Names of every source in `registry`.
pub fn list_sources(registry: &SourceRegistry) -> Vec<String> {
    registry.list_sources()
}

/// Query `sources` once and return every untested proxy found.
pub fn get_proxies<I, S>(registry: &SourceRegistry, sources: I) -> Result<Vec<String>, PoolError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let pool = ProxyGet::new(registry, sources, &ProxyPoolConfig::default())?;
    pool.wait();
    pool.get(None, false)
}
