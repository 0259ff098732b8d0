//! Built-in scrapers for public proxy listing sites.
//!
//! Each scraper fetches one site, applies that site's own quality filters and
//! returns `http://host:port` strings. The HTML parsing is kept in plain
//! functions so it can be exercised without the network.

pub mod aliveproxy;
pub mod checkerproxy;
pub mod cool_proxy;
pub mod freeproxylist;
pub mod letushide;
pub mod proxy_ip_list;

pub use aliveproxy::AliveProxy;
pub use checkerproxy::CheckerProxy;
pub use cool_proxy::CoolProxy;
pub use freeproxylist::FreeProxyList;
pub use letushide::LetUsHide;
pub use proxy_ip_list::ProxyIpList;

use crate::config::ProxyPoolConfig;
use crate::source::SourceRegistry;

use reqwest::Client;

/// Build the HTTP client shared by the scrapers.
pub fn new_client(config: &ProxyPoolConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}

pub(crate) fn register_all(registry: SourceRegistry, client: &Client) -> SourceRegistry {
    registry
        .register("aliveproxy", AliveProxy::new(client.clone()))
        .register("checkerproxy", CheckerProxy::new(client.clone()))
        .register("cool_proxy", CoolProxy::new(client.clone()))
        .register("freeproxylist", FreeProxyList::new(client.clone()))
        .register("letushide", LetUsHide::new(client.clone()))
        .register("proxy_ip_list", ProxyIpList::new(client.clone()))
}
