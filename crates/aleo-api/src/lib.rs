//! HTTP surface of the exporter: `/metrics` and a landing page.
//!
//! ```rust,ignore
//! let app = MetricsApi::new(collector)
//!     .metrics_path("/metrics")
//!     .shutdown(shutdown.clone())
//!     .router();
//! axum::serve(listener, app).await?;
//! ```

mod error;
pub use error::ApiError;

mod http;
pub use http::{DEFAULT_METRICS_PATH, MetricsApi, is_literal_metrics_path};

pub use axum;
