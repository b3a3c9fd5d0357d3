//! Prometheus metrics for credential expiry.
//!
//! This module turns a directory listing into Prometheus gauges and
//! serves them over HTTP. Nothing is cached between scrapes: every
//! request to `/metrics` rebuilds the registry from a fresh listing.
//!
//! # Metrics Exposed
//!
//! ## Credential Metrics
//! - `application_<appId>_<i>` - Remaining days for the `i`-th credential of an
//!   application, labelled `application`, `type` (`secret` or `certificat`) and `app`.
//!   Secrets count down to their end date; certificates report their total validity span.
//!
//! ## Exporter Metrics
//! - `credential_exporter_last_collection_success` - 1 if the last directory fetch succeeded
//! - `credential_exporter_last_collection_duration_seconds` - Duration of the last collection
//! - `process_*` - Process metrics (Linux only)
//!
//! # Example
//!
//! ```no_run
//! use credential_expiry_exporter::directory::StaticDirectory;
//! use credential_expiry_exporter::metrics::CredentialCollector;
//! use std::time::Duration;
//!
//! # async fn run() {
//! let directory = StaticDirectory::new(Vec::new());
//! let mut collector = CredentialCollector::new(directory, Duration::from_secs(30))
//!     .expect("Failed to create registry");
//!
//! let report = collector.collect().await;
//! println!("{} metrics", report.registered);
//! println!("{}", collector.registry().encode().unwrap());
//! # }
//! ```

mod collector;
mod registry;
mod server;

pub use collector::{CollectionReport, CredentialCollector};
pub use registry::{
    CredentialKind, CredentialMetric, CredentialRegistry, MetricsError, Registration, APP_LABEL,
};
pub use server::{router, ScrapeServer, ServerError, SharedCollector, LIVENESS_BODY};
