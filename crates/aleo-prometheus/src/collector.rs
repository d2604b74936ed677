use std::sync::Arc;
use std::time::Instant;

use aleo_fetch::StateSource;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::{ExporterMetrics, ScrapeOutcome};
use crate::schema::MetricSchema;
use crate::scrape::Scrape;
use crate::translate::{ScrapeResult, translate};

/// Runs one fetch per scrape and translates the outcome.
///
/// Holds nothing mutable besides atomic self-metrics, so concurrent scrapes
/// need no locking; each one performs its own independent fetch.
pub struct NodeCollector<S> {
    source: S,
    schema: Arc<MetricSchema>,
    metrics: ExporterMetrics,
}

impl<S> NodeCollector<S>
where
    S: StateSource,
{
    pub fn new(source: S, schema: Arc<MetricSchema>, metrics: ExporterMetrics) -> Self {
        Self {
            source,
            schema,
            metrics,
        }
    }

    #[inline]
    pub fn schema(&self) -> &MetricSchema {
        &self.schema
    }

    #[inline]
    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one scrape.
    ///
    /// Returns `None` when `cancel` fires before the scrape completes; nothing
    /// is emitted in that case. Fetch failures are not errors here: they become
    /// a scrape holding only `up = 0`.
    pub async fn collect(&self, cancel: &CancellationToken) -> Option<Scrape> {
        if cancel.is_cancelled() {
            self.metrics.record_scrape(ScrapeOutcome::Cancelled);
            return None;
        }

        let started = Instant::now();
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(target_url = %self.source.target(), "scrape cancelled during fetch");
                self.metrics.record_scrape(ScrapeOutcome::Cancelled);
                return None;
            }
            res = self.source.fetch() => res,
        };
        self.metrics.record_fetch(started.elapsed());

        let result = ScrapeResult::from(fetched);
        let outcome = match &result {
            ScrapeResult::Up(_) => ScrapeOutcome::Up,
            ScrapeResult::Down(err) => {
                warn!(
                    target_url = %self.source.target(),
                    cause = err.cause(),
                    error = %err,
                    "node scrape failed, reporting target down"
                );
                ScrapeOutcome::from_error(err)
            }
        };

        if cancel.is_cancelled() {
            self.metrics.record_scrape(ScrapeOutcome::Cancelled);
            return None;
        }
        self.metrics.record_scrape(outcome);

        let scrape = translate(&self.schema, &result);
        debug!(
            target_url = %self.source.target(),
            up = scrape.is_up(),
            observations = scrape.len(),
            "node scraped"
        );
        Some(scrape)
    }
}
