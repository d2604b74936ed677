use std::sync::Arc;

use aleo_fetch::StateSource;
use aleo_prometheus::{NodeCollector, TEXT_FORMAT, encode_text};
use axum::{
    Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::ApiError;

pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// True for a path axum mounts verbatim: rooted, not `/` itself, and free of
/// `{capture}` braces or segments opening with `:` or `*`.
pub fn is_literal_metrics_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    !rest.is_empty()
        && !path.contains(['{', '}'])
        && rest
            .split('/')
            .all(|segment| !segment.starts_with([':', '*']))
}

/// HTTP API service builder.
pub struct MetricsApi<S> {
    collector: Arc<NodeCollector<S>>,
    metrics_path: String,
    include_exporter_metrics: bool,
    shutdown: CancellationToken,
}

struct ApiState<S> {
    collector: Arc<NodeCollector<S>>,
    include_exporter_metrics: bool,
    shutdown: CancellationToken,
    landing: String,
}

impl<S> MetricsApi<S>
where
    S: StateSource,
{
    pub fn new(collector: Arc<NodeCollector<S>>) -> Self {
        Self {
            collector,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            include_exporter_metrics: false,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = path.into();
        self
    }

    /// Append `aleo_exporter_*` families after the node gauges.
    pub fn include_exporter_metrics(mut self, include: bool) -> Self {
        self.include_exporter_metrics = include;
        self
    }

    /// Cancelling this token aborts in-flight scrapes.
    pub fn shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// # Panics
    ///
    /// If the metrics path fails [`is_literal_metrics_path`].
    ///
    /// Routes:
    /// - GET {metrics_path} - One scrape of the node
    /// - GET / - Landing page
    pub fn router(self) -> Router {
        let state = Arc::new(ApiState {
            collector: self.collector,
            include_exporter_metrics: self.include_exporter_metrics,
            shutdown: self.shutdown,
            landing: landing_page(&self.metrics_path),
        });

        Router::new()
            .route(&self.metrics_path, get(metrics::<S>))
            .route("/", get(landing::<S>))
            .with_state(state)
    }
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Aleo Exporter</title></head>\n\
         <body>\n\
         <h1>Aleo Exporter</h1>\n\
         <p><a href=\"{metrics_path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET {metrics_path}
async fn metrics<S>(State(state): State<Arc<ApiState<S>>>) -> Result<impl IntoResponse, ApiError>
where
    S: StateSource,
{
    // Dropping the handler (client went away) cancels the fetch as well.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let collector = &state.collector;
    let scrape = collector.collect(&cancel).await.ok_or(ApiError::Cancelled)?;

    let mut families = scrape.into_families(collector.schema())?;
    if state.include_exporter_metrics {
        families.extend(collector.metrics().gather());
    }
    let body = encode_text(&families)?;
    trace!(bytes = body.len(), "metrics rendered");

    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}

/// GET /
async fn landing<S>(State(state): State<Arc<ApiState<S>>>) -> Html<String>
where
    S: StateSource,
{
    Html(state.landing.clone())
}
