//! # free-proxy-pool
//!
//! Retrieve free HTTP proxies from public listing sites.
//!
//! A [`ProxyPool`] queries a set of named [`Source`]s concurrently, collects
//! their output into a deduplicated set, and optionally routes every proxy
//! through a [`LivenessChecker`] to keep only those that forward traffic.
//! [`blocking::ProxyGet`] offers the same pool to synchronous callers.

pub mod blocking;
pub mod checker;
pub mod config;
pub mod error;
pub mod pool;
pub mod report;
pub mod source;
pub mod sources;
mod utils;

pub use checker::{HttpProbe, LivenessChecker, Probe};
pub use config::{ProxyPoolConfig, ProxyPoolConfigBuilder};
pub use error::{PoolError, ProbeError, SourceError};
pub use pool::ProxyPool;
pub use report::{RunReport, SourceOutcome};
pub use source::{from_fn, FnSource, Source, SourceRegistry};
