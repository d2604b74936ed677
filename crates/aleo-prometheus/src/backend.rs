use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, proto::MetricFamily};

use aleo_fetch::{DecodeError, FetchError};
use aleo_model::NAMESPACE;

/// How a scrape ended, as recorded in `aleo_exporter_scrapes_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Up,
    Unreachable,
    Upstream,
    Decode,
    Rpc,
    Cancelled,
}

impl ScrapeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeOutcome::Up => "up",
            ScrapeOutcome::Unreachable => "unreachable",
            ScrapeOutcome::Upstream => "upstream",
            ScrapeOutcome::Decode => "decode",
            ScrapeOutcome::Rpc => "rpc",
            ScrapeOutcome::Cancelled => "cancelled",
        }
    }

    pub fn from_error(err: &FetchError) -> Self {
        match err {
            FetchError::Unreachable(_) => ScrapeOutcome::Unreachable,
            FetchError::UpstreamError(_) => ScrapeOutcome::Upstream,
            FetchError::Decode(DecodeError::Rpc { .. }) => ScrapeOutcome::Rpc,
            FetchError::Decode(_) => ScrapeOutcome::Decode,
        }
    }
}

/// Exporter self-metrics, kept in a private registry.
///
/// - `aleo_exporter_scrapes_total{outcome}` - Counter
/// - `aleo_exporter_fetch_duration_seconds` - Histogram
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    scrapes_total: IntCounterVec,
    fetch_duration: Histogram,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scrapes_total = IntCounterVec::new(
            Opts::new("scrapes_total", "Scrapes served, by outcome.")
                .namespace(NAMESPACE)
                .subsystem("exporter"),
            &["outcome"],
        )?;
        let fetch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "fetch_duration_seconds",
                "Time spent fetching node state.",
            )
            .namespace(NAMESPACE)
            .subsystem("exporter")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(fetch_duration.clone()))?;

        Ok(Self {
            registry,
            scrapes_total,
            fetch_duration,
        })
    }

    pub fn record_scrape(&self, outcome: ScrapeOutcome) {
        self.scrapes_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_fetch(&self, elapsed: Duration) {
        self.fetch_duration.observe(elapsed.as_secs_f64());
    }

    /// Number of scrapes recorded with `outcome`.
    pub fn scrapes(&self, outcome: ScrapeOutcome) -> u64 {
        self.scrapes_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_text;

    #[test]
    fn counts_outcomes() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.record_scrape(ScrapeOutcome::Up);
        metrics.record_scrape(ScrapeOutcome::Up);
        metrics.record_scrape(ScrapeOutcome::Unreachable);

        assert_eq!(metrics.scrapes(ScrapeOutcome::Up), 2);
        assert_eq!(metrics.scrapes(ScrapeOutcome::Unreachable), 1);
        assert_eq!(metrics.scrapes(ScrapeOutcome::Decode), 0);
    }

    #[test]
    fn renders_under_exporter_subsystem() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.record_scrape(ScrapeOutcome::Upstream);
        metrics.record_fetch(Duration::from_millis(20));

        let text = encode_text(&metrics.gather()).unwrap();
        assert!(text.contains("aleo_exporter_scrapes_total{outcome=\"upstream\"} 1"));
        assert!(text.contains("aleo_exporter_fetch_duration_seconds_count 1"));

        let prefix = format!("{NAMESPACE}_exporter_");
        assert!(
            text.lines()
                .filter(|l| !l.starts_with('#'))
                .all(|l| l.starts_with(&prefix))
        );
    }

    #[test]
    fn outcome_from_error() {
        assert_eq!(
            ScrapeOutcome::from_error(&FetchError::UpstreamError(401)),
            ScrapeOutcome::Upstream
        );
    }
}
