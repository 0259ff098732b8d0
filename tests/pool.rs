use anyhow::anyhow;
use async_trait::async_trait;
use free_proxy_pool::{
    from_fn, LivenessChecker, PoolError, Probe, ProbeError, ProxyPool, ProxyPoolConfig,
    SourceOutcome, SourceRegistry,
};
use std::collections::HashSet;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixed(proxies: &[&str]) -> impl free_proxy_pool::Source {
    let proxies: Vec<String> = proxies.iter().map(|p| p.to_string()).collect();
    from_fn(move || {
        let proxies = proxies.clone();
        async move { Ok::<_, anyhow::Error>(proxies) }
    })
}

fn failing() -> impl free_proxy_pool::Source {
    from_fn(|| async { Err::<Vec<String>, _>(anyhow!("connection reset")) })
}

fn registry() -> SourceRegistry {
    SourceRegistry::new()
        .register("A", fixed(&["http://1.2.3.4:80", "http://1.2.3.4:80"]))
        .register("B", fixed(&["http://5.6.7.8:3128"]))
        .register("C", fixed(&["http://9.9.9.9:8080", "http://5.6.7.8:3128"]))
        .register("broken", failing())
}

fn as_set(proxies: Vec<String>) -> HashSet<String> {
    proxies.into_iter().collect()
}

/// Endpoints on port 80 answer, everything else times out.
struct PortProbe;

#[async_trait]
impl Probe for PortProbe {
    async fn probe(&self, endpoint: &str) -> Result<(), ProbeError> {
        if endpoint.ends_with(":80") {
            Ok(())
        } else {
            Err(ProbeError::Timeout(endpoint.to_string()))
        }
    }
}

#[tokio::test]
async fn duplicates_are_collapsed() {
    init_logger();
    let pool = assert_ok!(ProxyPool::spawn(&registry(), ["A", "B"], &ProxyPoolConfig::default()));
    pool.wait().await;

    let proxies = assert_ok!(pool.get(None, false));
    assert_eq!(proxies.len(), 2);
    assert_eq!(
        as_set(proxies),
        HashSet::from(["http://1.2.3.4:80".to_string(), "http://5.6.7.8:3128".to_string()])
    );
}

#[tokio::test]
async fn only_selected_sources_contribute() {
    let pool = assert_ok!(ProxyPool::spawn(&registry(), ["B"], &ProxyPoolConfig::default()));
    pool.wait().await;
    assert_eq!(assert_ok!(pool.get(None, false)), vec!["http://5.6.7.8:3128"]);
}

#[tokio::test]
async fn failing_source_is_isolated() {
    let registry = SourceRegistry::new()
        .register("bad", failing())
        .register("good", fixed(&["http://9.9.9.9:8080"]));
    let pool = assert_ok!(ProxyPool::spawn(&registry, ["bad", "good"], &ProxyPoolConfig::default()));
    pool.wait().await;

    assert_eq!(assert_ok!(pool.get(None, false)), vec!["http://9.9.9.9:8080"]);
    let report = pool.report().unwrap();
    assert_eq!(report.failed(), vec!["bad"]);
}

#[tokio::test]
async fn wait_and_get_are_idempotent() {
    let pool = assert_ok!(ProxyPool::spawn(&registry(), ["A", "C"], &ProxyPoolConfig::default()));
    pool.wait().await;
    let first = assert_ok!(pool.get(None, false));
    pool.wait().await;
    let second = assert_ok!(pool.get(None, false));
    assert_eq!(as_set(first), as_set(second));
}

#[tokio::test]
async fn concurrent_waiters_all_return() {
    let pool = std::sync::Arc::new(assert_ok!(ProxyPool::spawn(
        &registry(),
        Vec::<String>::new(),
        &ProxyPoolConfig::default()
    )));
    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let pool = std::sync::Arc::clone(&pool);
            tokio::spawn(async move { pool.wait().await })
        })
        .collect();
    for waiter in waiters {
        assert_ok!(waiter.await);
    }
    assert!(pool.is_finished());
}

#[tokio::test]
async fn count_cap_returns_nested_subsets() {
    let pool = assert_ok!(ProxyPool::spawn(&registry(), Vec::<String>::new(), &ProxyPoolConfig::default()));
    pool.wait().await;

    let all = as_set(assert_ok!(pool.get(None, false)));
    assert_eq!(all.len(), 3);
    let one = assert_ok!(pool.get(Some(1), false));
    let two = assert_ok!(pool.get(Some(2), false));
    assert_eq!(one.len(), 1);
    assert_eq!(two.len(), 2);
    assert!(as_set(one).is_subset(&as_set(two.clone())));
    assert!(as_set(two).is_subset(&all));
    assert_eq!(assert_ok!(pool.get(Some(10), false)).len(), 3);
    assert!(assert_ok!(pool.get(Some(0), false)).is_empty());
}

#[tokio::test]
async fn early_get_does_not_lose_results() {
    let mut registry = SourceRegistry::new();
    for source in 0..20 {
        let proxies: Vec<String> = (0..50)
            .map(|i| format!("http://10.{}.0.{}:8080", source, i))
            .collect();
        registry = registry.register(
            format!("s{}", source),
            from_fn(move || {
                let proxies = proxies.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, anyhow::Error>(proxies)
                }
            }),
        );
    }

    let pool = assert_ok!(ProxyPool::spawn(&registry, Vec::<String>::new(), &ProxyPoolConfig::default()));
    let early = assert_ok!(pool.get(None, false));
    pool.wait().await;
    let all = assert_ok!(pool.get(None, false));

    assert!(early.len() <= all.len());
    assert!(as_set(early).is_subset(&as_set(all.clone())));
    assert_eq!(all.len(), 1000);
}

#[tokio::test]
async fn tested_results_need_testing_enabled() {
    let pool = assert_ok!(ProxyPool::spawn(&registry(), ["B"], &ProxyPoolConfig::default()));
    pool.wait().await;
    assert!(!pool.is_tested());
    let err = assert_err!(pool.get(None, true));
    assert!(matches!(err, PoolError::NotTested));
}

#[tokio::test]
async fn tested_set_is_subset_of_untested() {
    let checker = LivenessChecker::with_probe(PortProbe, 2);
    let pool = assert_ok!(ProxyPool::spawn_with_checker(
        &registry(),
        Vec::<String>::new(),
        checker,
        &ProxyPoolConfig::default()
    ));
    pool.wait().await;

    let untested = as_set(assert_ok!(pool.get(None, false)));
    let tested = as_set(assert_ok!(pool.get(None, true)));
    assert_eq!(tested, HashSet::from(["http://1.2.3.4:80".to_string()]));
    assert!(tested.is_subset(&untested));
    assert_eq!(
        pool.report().unwrap().outcome("A"),
        Some(&SourceOutcome::Fetched { found: 2, alive: Some(2) })
    );
}

#[tokio::test]
async fn unknown_name_is_a_configuration_error() {
    let err = assert_err!(ProxyPool::spawn(&registry(), ["Z"], &ProxyPoolConfig::default()));
    assert!(matches!(err, PoolError::UnknownSource(name) if name == "Z"));
}

#[tokio::test]
async fn slow_sources_overlap() {
    let slow = || {
        from_fn(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok::<_, anyhow::Error>(vec!["http://8.8.8.8:80".to_string()])
        })
    };
    let registry = SourceRegistry::new()
        .register("s1", slow())
        .register("s2", slow())
        .register("s3", slow());

    let started = std::time::Instant::now();
    let pool = assert_ok!(ProxyPool::spawn(&registry, Vec::<String>::new(), &ProxyPoolConfig::default()));
    pool.wait().await;

    assert!(started.elapsed() < Duration::from_millis(800));
    assert_eq!(assert_ok!(pool.get(None, false)), vec!["http://8.8.8.8:80"]);
}
