//! Credential metric registry.
//!
//! Holds one gauge per synthesized credential metric name, plus a fixed
//! set of process and exporter metrics that survive every rebuild.
//!
//! Lifecycle per scrape: `reset` → `register_or_skip`* → `encode`.

use prometheus::{
    core::Collector, proto::MetricFamily, Encoder, Gauge, IntGauge, Opts, Registry, TextEncoder,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Constant label attached to every credential metric.
pub const APP_LABEL: (&str, &str) = ("app", "Azure Certificat Expiration");

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Error raised by the prometheus crate, e.g. an invalid metric name.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Kind of credential a metric describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Client secret (password credential).
    Secret,
    /// Certificate (key credential).
    Certificate,
}

impl CredentialKind {
    /// Value of the `type` label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Certificate => "certificat",
        }
    }

    fn help_prefix(&self) -> &'static str {
        match self {
            Self::Secret => "Secret",
            Self::Certificate => "Certificate",
        }
    }
}

/// One credential metric ready to be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialMetric {
    /// Sanitized application identifier.
    pub app_id: String,
    /// Sanitized display name, used as the `application` label.
    pub application: String,
    /// Per-application sequence index.
    pub index: usize,
    /// Secret or certificate.
    pub kind: CredentialKind,
    /// Remaining whole days.
    pub days: u64,
}

impl CredentialMetric {
    /// Synthesized metric name, `application_<app_id>_<index>`.
    pub fn name(&self) -> String {
        format!("application_{}_{}", self.app_id, self.index)
    }

    fn help(&self) -> String {
        format!(
            "{} #{} for application {}",
            self.kind.help_prefix(),
            self.index,
            self.application
        )
    }

    fn to_gauge(&self) -> Result<Gauge, MetricsError> {
        let opts = Opts::new(self.name(), self.help())
            .const_label("application", self.application.as_str())
            .const_label("type", self.kind.label())
            .const_label(APP_LABEL.0, APP_LABEL.1);
        let gauge = Gauge::with_opts(opts)?;
        gauge.set(self.days as f64);
        Ok(gauge)
    }
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The entry was added.
    Registered,
    /// An entry with the same name already exists this cycle.
    Duplicate,
}

/// Prometheus registry for credential expiry metrics.
pub struct CredentialRegistry {
    /// Process and exporter metrics; never cleared.
    base: Registry,
    /// Credential gauges keyed by metric name.
    entries: BTreeMap<String, Gauge>,

    last_collection_success: IntGauge,
    last_collection_duration: Gauge,
}

impl CredentialRegistry {
    /// Creates an empty registry with process and exporter metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let base = Registry::new();

        #[cfg(target_os = "linux")]
        base.register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

        let last_collection_success = IntGauge::new(
            "credential_exporter_last_collection_success",
            "Whether the last directory collection succeeded (1=success, 0=failure)",
        )?;
        let last_collection_duration = Gauge::new(
            "credential_exporter_last_collection_duration_seconds",
            "Duration of the last directory collection in seconds",
        )?;

        base.register(Box::new(last_collection_success.clone()))?;
        base.register(Box::new(last_collection_duration.clone()))?;

        Ok(Self {
            base,
            entries: BTreeMap::new(),
            last_collection_success,
            last_collection_duration,
        })
    }

    /// Drops every credential entry. Process and exporter metrics are kept.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Inserts `metric` unless an entry with the same name already exists.
    ///
    /// The first entry registered under a name wins; later ones are
    /// dropped without touching it.
    pub fn register_or_skip(
        &mut self,
        metric: &CredentialMetric,
    ) -> Result<Registration, MetricsError> {
        let name = metric.name();
        if self.entries.contains_key(&name) {
            return Ok(Registration::Duplicate);
        }
        let gauge = metric.to_gauge()?;
        self.entries.insert(name, gauge);
        Ok(Registration::Registered)
    }

    /// Records the outcome of a collection pass.
    pub fn record_collection(&self, success: bool, duration_secs: f64) {
        self.last_collection_success.set(if success { 1 } else { 0 });
        self.last_collection_duration.set(duration_secs);
    }

    /// Number of credential entries currently registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no credential entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an entry named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Current value of the entry named `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries.get(name).map(Gauge::get)
    }

    fn gather(&self) -> Vec<MetricFamily> {
        let mut families = self.base.gather();
        families.extend(self.entries.values().flat_map(|gauge| gauge.collect()));
        families
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Content type of [`encode`](Self::encode) output.
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(app_id: &str, index: usize, days: u64) -> CredentialMetric {
        CredentialMetric {
            app_id: app_id.to_string(),
            application: "Billing".to_string(),
            index,
            kind: CredentialKind::Secret,
            days,
        }
    }

    fn credential_lines(output: &str) -> Vec<&str> {
        output
            .lines()
            .filter(|l| l.starts_with("application_"))
            .collect()
    }

    #[test]
    fn test_registry_creation() {
        let registry = CredentialRegistry::new();
        assert!(registry.is_ok());
        assert!(registry.unwrap().is_empty());
    }

    #[test]
    fn test_distinct_names_all_registered() {
        let mut registry = CredentialRegistry::new().unwrap();
        for i in 0..5 {
            assert_eq!(
                registry.register_or_skip(&secret("abc", i, 10)).unwrap(),
                Registration::Registered
            );
        }

        assert_eq!(registry.len(), 5);
        let output = registry.encode().unwrap();
        assert_eq!(credential_lines(&output).len(), 5);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut registry = CredentialRegistry::new().unwrap();
        registry.register_or_skip(&secret("abc", 0, 10)).unwrap();
        assert_eq!(
            registry.register_or_skip(&secret("abc", 0, 99)).unwrap(),
            Registration::Duplicate
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.value("application_abc_0"), Some(10.0));
    }

    #[test]
    fn test_reset_clears_entries_only() {
        let mut registry = CredentialRegistry::new().unwrap();
        registry.register_or_skip(&secret("abc", 0, 10)).unwrap();
        registry.record_collection(true, 0.25);

        registry.reset();

        assert!(registry.is_empty());
        let output = registry.encode().unwrap();
        assert!(credential_lines(&output).is_empty());
        assert!(output.contains("credential_exporter_last_collection_success 1"));
    }

    #[test]
    fn test_encode_labels() {
        let mut registry = CredentialRegistry::new().unwrap();
        registry
            .register_or_skip(&CredentialMetric {
                app_id: "abc".to_string(),
                application: "CafeProd".to_string(),
                index: 1,
                kind: CredentialKind::Certificate,
                days: 365,
            })
            .unwrap();

        let output = registry.encode().unwrap();
        assert!(output.contains("# HELP application_abc_1 Certificate #1 for application CafeProd"));
        assert!(output.contains("# TYPE application_abc_1 gauge"));
        let line = credential_lines(&output)[0];
        assert!(line.contains(r#"application="CafeProd""#));
        assert!(line.contains(r#"type="certificat""#));
        assert!(line.contains(r#"app="Azure Certificat Expiration""#));
        assert!(line.ends_with(" 365"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut registry = CredentialRegistry::new().unwrap();
        let result = registry.register_or_skip(&secret("a.b", 0, 1));
        assert!(matches!(result, Err(MetricsError::Prometheus(_))));
        assert!(registry.is_empty());
    }
}
