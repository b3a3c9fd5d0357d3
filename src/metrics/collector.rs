//! Credential collection.
//!
//! One collection pass rebuilds the registry from a fresh directory
//! listing. Secrets are enumerated before certificates, and the sequence
//! index is shared between them so every credential of an application
//! gets its own metric name.

use super::registry::{
    CredentialKind, CredentialMetric, CredentialRegistry, MetricsError, Registration,
};
use crate::directory::{Application, DirectoryError, DirectorySource};
use crate::expiry::{certificate_validity_days, secret_days_remaining};
use crate::sanitize::sanitize;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Summary of one collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Applications returned by the directory.
    pub applications: usize,
    /// Credential metrics registered.
    pub registered: usize,
    /// Entries dropped because their name was already taken.
    pub duplicates: usize,
    /// Credentials skipped for missing dates or an unusable name.
    pub malformed: usize,
    /// Secrets whose end date has passed.
    pub expired: usize,
    /// Applications skipped because the directory returned no identifier.
    pub skipped_applications: usize,
    /// Whether the directory fetch succeeded.
    pub fetched: bool,
}

/// Rebuilds the credential registry from a directory source.
pub struct CredentialCollector<S> {
    source: S,
    registry: CredentialRegistry,
    fetch_timeout: Duration,
}

impl<S: DirectorySource> CredentialCollector<S> {
    /// Creates a collector with an empty registry.
    pub fn new(source: S, fetch_timeout: Duration) -> Result<Self, MetricsError> {
        Ok(Self {
            source,
            registry: CredentialRegistry::new()?,
            fetch_timeout,
        })
    }

    /// The registry as left by the last collection.
    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    /// The directory source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one collection pass against the current time.
    pub async fn collect(&mut self) -> CollectionReport {
        self.collect_at(Utc::now()).await
    }

    /// Runs one collection pass, computing secret expiry relative to `now`.
    ///
    /// The registry is always reset first. If the fetch fails or times
    /// out, it stays empty until the next pass.
    pub async fn collect_at(&mut self, now: DateTime<Utc>) -> CollectionReport {
        let started = Instant::now();
        self.registry.reset();

        let mut report = CollectionReport::default();

        match self.fetch().await {
            Ok(applications) => {
                report.fetched = true;
                report.applications = applications.len();
                for application in &applications {
                    self.populate(application, now, &mut report);
                }
                tracing::info!(
                    applications = report.applications,
                    registered = report.registered,
                    expired = report.expired,
                    malformed = report.malformed,
                    skipped_applications = report.skipped_applications,
                    duplicates = report.duplicates,
                    "Credential collection complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Directory fetch failed");
            }
        }

        self.registry
            .record_collection(report.fetched, started.elapsed().as_secs_f64());
        report
    }

    async fn fetch(&self) -> Result<Vec<Application>, DirectoryError> {
        tokio::time::timeout(self.fetch_timeout, self.source.applications())
            .await
            .map_err(|_| DirectoryError::Timeout(self.fetch_timeout.as_secs()))?
    }

    fn populate(
        &mut self,
        application: &Application,
        now: DateTime<Utc>,
        report: &mut CollectionReport,
    ) {
        if application.app_id.is_empty() {
            tracing::warn!(
                display_name = application.display_name.as_deref().unwrap_or_default(),
                "Application has no identifier, skipping"
            );
            report.skipped_applications += 1;
            return;
        }

        let app_id = sanitize(&application.app_id);
        let display_name = sanitize(application.display_name.as_deref().unwrap_or_default());
        let mut index = 0usize;

        for secret in &application.password_credentials {
            let i = index;
            index += 1;

            let Some(end) = secret.end_date_time else {
                tracing::warn!(
                    app_id = %app_id,
                    index = i,
                    "Secret has no usable end date, skipping"
                );
                report.malformed += 1;
                continue;
            };

            let expiry = secret_days_remaining(end, now);
            if expiry.is_expired() {
                tracing::error!(
                    application = %display_name,
                    index = i,
                    expired_at = %end.format("%d/%m/%Y"),
                    "Secret has expired"
                );
                report.expired += 1;
            }

            self.register(
                &app_id,
                &display_name,
                i,
                CredentialKind::Secret,
                expiry.days(),
                report,
            );
        }

        for certificate in &application.key_credentials {
            let i = index;
            index += 1;

            let (Some(start), Some(end)) = (certificate.start_date_time, certificate.end_date_time)
            else {
                tracing::warn!(
                    app_id = %app_id,
                    index = i,
                    "Certificate has no usable start or end date, skipping"
                );
                report.malformed += 1;
                continue;
            };

            let days = certificate_validity_days(start, end);
            self.register(
                &app_id,
                &display_name,
                i,
                CredentialKind::Certificate,
                days,
                report,
            );
        }
    }

    fn register(
        &mut self,
        app_id: &str,
        application: &str,
        index: usize,
        kind: CredentialKind,
        days: u64,
        report: &mut CollectionReport,
    ) {
        let metric = CredentialMetric {
            app_id: app_id.to_string(),
            application: application.to_string(),
            index,
            kind,
            days,
        };

        let name = metric.name();
        match self.registry.register_or_skip(&metric) {
            Ok(Registration::Registered) => report.registered += 1,
            Ok(Registration::Duplicate) => {
                tracing::debug!(metric = %name, "Metric already registered this cycle");
                report.duplicates += 1;
            }
            Err(e) => {
                tracing::warn!(metric = %name, error = %e, "Failed to register metric");
                report.malformed += 1;
            }
        }
    }
}
