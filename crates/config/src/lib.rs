//! Configuration types for bridgewatch hosts.

mod config;

pub use config::{Config, LoggingConfig, ReconcilerConfig};
