//! Credential Expiry Exporter Library
//!
//! A Prometheus exporter reporting how many days are left on the client
//! secrets and certificates of applications registered in an identity
//! provider directory.
//!
//! # Architecture
//!
//! Each scrape drives one pass through the pipeline:
//!
//! ```text
//! scrape → collector → directory
//!              ↓
//!       sanitize + expiry → registry → exposition text
//! ```
//!
//! # Design Principles
//!
//! - **Fresh on every scrape**: no background refresh, no cached listing
//! - **Degrade, don't fail**: an upstream failure yields an empty credential set, not an error
//! - **One pass per response**: concurrent scrapes are serialized
//!
//! # Example
//!
//! ```no_run
//! use credential_expiry_exporter::{
//!     config::ExporterConfig,
//!     directory::GraphDirectory,
//!     metrics::{CredentialCollector, ScrapeServer},
//! };
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExporterConfig::default().with_env();
//! config.validate()?;
//!
//! let directory = GraphDirectory::new(config.directory.clone())?;
//! let timeout = Duration::from_secs(config.directory.timeout_secs);
//! let collector = CredentialCollector::new(directory, timeout)?;
//!
//! ScrapeServer::new(config.server.bind_addr, collector)
//!     .run(async { let _ = tokio::signal::ctrl_c().await; })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod directory;
pub mod expiry;
pub mod metrics;
pub mod sanitize;

// Re-export commonly used types at crate root
pub use config::{ConfigError, ExporterConfig};
pub use directory::{Application, DirectoryError, DirectorySource, GraphDirectory};
pub use expiry::Expiry;
pub use metrics::{CollectionReport, CredentialCollector, CredentialRegistry, ScrapeServer};
pub use sanitize::sanitize;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
