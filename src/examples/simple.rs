//! Simple example of using free-proxy-pool.

use free_proxy_pool::{ProxyPool, ProxyPoolConfig, SourceRegistry};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ProxyPoolConfig::builder()
        .test(true)
        .check_url("http://httpbin.org/ip")
        .check_timeout(Duration::from_secs(2))
        .max_concurrent_checks(20)
        // give up on listing sites that hang
        .source_timeout(Duration::from_secs(60))
        .build();

    let registry = SourceRegistry::builtin(&config)?;
    println!("Available sources: {:?}", registry.list_sources());

    let pool = ProxyPool::spawn(&registry, Vec::<String>::new(), &config)?;
    println!("Fetching proxies...");
    pool.wait().await;

    if let Some(report) = pool.report() {
        for (source, outcome) in report.outcomes() {
            println!("{}: {:?}", source, outcome);
        }
    }

    let total = pool.get(None, false)?.len();
    let alive = pool.get(None, true)?.len();
    println!("{} proxies found, {} alive", total, alive);
    for proxy in pool.get(Some(10), true)? {
        println!("{}", proxy);
    }

    Ok(())
}
