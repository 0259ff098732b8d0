//! Core proxy pool implementation.

use crate::checker::LivenessChecker;
use crate::config::ProxyPoolConfig;
use crate::error::{PoolError, SourceError};
use crate::report::{RunReport, SourceOutcome};
use crate::source::{Source, SourceRegistry};

use futures::future;
use log::{info, warn};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;

#[derive(Debug, Default)]
struct Results {
    untested: BTreeSet<String>,
    tested: BTreeSet<String>,
    report: Option<RunReport>,
}

/// One retrieval run over a set of sources.
///
/// Construction dispatches one task per source plus a collector task. Call
/// [`ProxyPool::wait`] before reading results with [`ProxyPool::get`].
#[derive(Debug)]
pub struct ProxyPool {
    sources: Vec<String>,
    tested: bool,
    results: Arc<RwLock<Results>>,
    done: watch::Receiver<bool>,
}

impl ProxyPool {
    /// Start querying `sources` from `registry`; an empty list means every
    /// registered source.
    ///
    /// Unknown names fail with [`PoolError::UnknownSource`] before anything is
    /// spawned. Outside of a tokio runtime this fails with
    /// [`PoolError::NoRuntime`].
    pub fn spawn<I, S>(
        registry: &SourceRegistry,
        sources: I,
        config: &ProxyPoolConfig,
    ) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let checker = config.test.then(|| LivenessChecker::from_config(config));
        Self::start(registry, sources, checker, config.source_timeout)
    }

    /// Like [`ProxyPool::spawn`], with testing enabled through `checker`.
    pub fn spawn_with_checker<I, S>(
        registry: &SourceRegistry,
        sources: I,
        checker: LivenessChecker,
        config: &ProxyPoolConfig,
    ) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::start(registry, sources, Some(checker), config.source_timeout)
    }

    fn start<I, S>(
        registry: &SourceRegistry,
        sources: I,
        checker: Option<LivenessChecker>,
        source_timeout: Option<Duration>,
    ) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let runtime = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;

        let mut names: Vec<String> = sources.into_iter().map(Into::into).collect();
        if names.is_empty() {
            names = registry.list_sources();
        }
        let selected = names
            .iter()
            .map(|name| {
                registry
                    .get(name)
                    .map(|source| (name.clone(), source))
                    .ok_or_else(|| PoolError::UnknownSource(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Fetching proxies from {} sources{}",
            selected.len(),
            if checker.is_some() { " with liveness testing" } else { "" }
        );

        let (untested_tx, untested_rx) = mpsc::unbounded_channel();
        let (tested_tx, tested_rx) = mpsc::unbounded_channel();

        let workers: Vec<JoinHandle<SourceOutcome>> = selected
            .into_iter()
            .map(|(name, source)| {
                let worker = Worker {
                    name,
                    source,
                    checker: checker.clone(),
                    timeout: source_timeout,
                    untested: untested_tx.clone(),
                    tested: tested_tx.clone(),
                };
                runtime.spawn(worker.run())
            })
            .collect();
        // workers hold the only remaining senders
        drop(untested_tx);
        drop(tested_tx);

        let results = Arc::new(RwLock::new(Results::default()));
        let (done_tx, done_rx) = watch::channel(false);
        runtime.spawn(collect_results(
            names.clone(),
            workers,
            untested_rx,
            tested_rx,
            Arc::clone(&results),
            done_tx,
        ));

        Ok(Self {
            sources: names,
            tested: checker.is_some(),
            results,
            done: done_rx,
        })
    }

    /// Wait until every source has finished and results have been collected.
    ///
    /// Safe to call any number of times, and from several tasks at once.
    pub async fn wait(&self) {
        let mut done = self.done.clone();
        if done.wait_for(|finished| *finished).await.is_err() {
            warn!("Proxy collector stopped before publishing results");
        }
    }

    /// Whether results have been collected.
    pub fn is_finished(&self) -> bool {
        *self.done.borrow()
    }

    /// Up to `n` collected proxies (all when `n` is `None`).
    ///
    /// Before [`ProxyPool::wait`] returns this yields an empty snapshot.
    /// Requesting tested proxies from a pool built without testing fails with
    /// [`PoolError::NotTested`].
    pub fn get(&self, n: Option<usize>, tested: bool) -> Result<Vec<String>, PoolError> {
        if tested && !self.tested {
            return Err(PoolError::NotTested);
        }

        let results = self.results.read();
        let set = if tested { &results.tested } else { &results.untested };
        Ok(set.iter().take(n.unwrap_or(usize::MAX)).cloned().collect())
    }

    /// Per-source outcomes, once collection has finished.
    pub fn report(&self) -> Option<RunReport> {
        self.results.read().report.clone()
    }

    /// Names of the sources this pool was asked to query.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn is_tested(&self) -> bool {
        self.tested
    }
}

struct Worker {
    name: String,
    source: Arc<dyn Source>,
    checker: Option<LivenessChecker>,
    timeout: Option<Duration>,
    untested: UnboundedSender<String>,
    tested: UnboundedSender<String>,
}

impl Worker {
    async fn run(self) -> SourceOutcome {
        let fetched = match self.timeout {
            Some(limit) => match time::timeout(limit, self.source.fetch()).await {
                Ok(fetched) => fetched,
                Err(_) => {
                    warn!("Source {} timed out after {:?}", self.name, limit);
                    return SourceOutcome::TimedOut;
                }
            },
            None => self.source.fetch().await,
        };

        let proxies = match fetched {
            Ok(proxies) => proxies,
            Err(cause) => {
                let error = SourceError::new(self.name, cause);
                warn!("{}", error);
                return SourceOutcome::Failed(format!("{:#}", error.cause));
            }
        };
        info!("Fetched {} proxies from {}", proxies.len(), self.name);

        let found = proxies.len();
        for proxy in &proxies {
            // receiver lives until every worker has been joined
            let _ = self.untested.send(proxy.clone());
        }

        let alive = match &self.checker {
            Some(checker) => {
                let alive = checker.test(proxies).await;
                let count = alive.len();
                for proxy in alive {
                    let _ = self.tested.send(proxy);
                }
                Some(count)
            }
            None => None,
        };

        SourceOutcome::Fetched { found, alive }
    }
}

async fn collect_results(
    names: Vec<String>,
    workers: Vec<JoinHandle<SourceOutcome>>,
    mut untested_rx: UnboundedReceiver<String>,
    mut tested_rx: UnboundedReceiver<String>,
    results: Arc<RwLock<Results>>,
    done: watch::Sender<bool>,
) {
    let mut report = RunReport::default();
    for (name, joined) in names.into_iter().zip(future::join_all(workers).await) {
        let outcome = joined.unwrap_or_else(|e| {
            warn!("Source {} task aborted: {}", name, e);
            SourceOutcome::Failed(e.to_string())
        });
        report.record(name, outcome);
    }

    let mut untested = BTreeSet::new();
    while let Ok(proxy) = untested_rx.try_recv() {
        untested.insert(proxy);
    }
    let mut tested = BTreeSet::new();
    while let Ok(proxy) = tested_rx.try_recv() {
        tested.insert(proxy);
    }

    info!(
        "Collected {} unique proxies ({} tested) from {} sources, {} failed",
        untested.len(),
        tested.len(),
        report.outcomes().len(),
        report.failed().len()
    );

    {
        let mut results = results.write();
        results.untested = untested;
        results.tested = tested;
        results.report = Some(report);
    }
    let _ = done.send(true);
}
