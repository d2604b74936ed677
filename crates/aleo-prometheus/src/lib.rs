//! Translation of node snapshots into Prometheus gauges.
//!
//! [`NodeCollector`] runs one fetch per scrape and turns the outcome into an ordered
//! [`Scrape`]: `aleo_up` first, followed by the node and channel gauges when the
//! target answered. Failures collapse into a single `aleo_up 0` observation.
//!
//! ## Metrics
//! - `aleo_up` - 1 when the last fetch succeeded, 0 otherwise
//! - `aleo_type{type}` - node type, constant 1
//! - `aleo_status{channel, status}` - node status, constant 1
//! - `aleo_connected_sync_nodes{channel}`
//! - `aleo_connected_peers{channel}`
//! - `aleo_candidate_peers{channel}`
//! - `aleo_cumulative_weight{channel}`
//! - `aleo_latest_block_height{channel}`
//! - `aleo_blocks_mined{channel}` - blocks mined at or above height 18000
//! - `aleo_blocks_mined_calibrate{channel}` - blocks mined below height 18000
//!
//! The `channel` label is only present when the upstream reports a channel breakdown.
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; see `aleo-api`.
//!
//! ```rust,ignore
//! let scrape = collector.collect(&cancel).await?;
//! let families = scrape.into_families(collector.schema())?;
//! let body = encode_text(&families)?;
//! ```

mod schema;
pub use schema::{
    LABEL_CHANNEL, LABEL_STATUS, LABEL_TYPE, MetricKind, MetricSchema, MetricSpec, SchemaError,
};

mod scrape;
pub use scrape::{Observation, Scrape};

mod translate;
pub use translate::{ScrapeResult, translate};

mod collector;
pub use collector::NodeCollector;

mod backend;
pub use backend::{ExporterMetrics, ScrapeOutcome};

mod encode;
pub use encode::{EncodeError, encode_text};

pub use prometheus::{Encoder, Registry, TEXT_FORMAT, TextEncoder, proto::MetricFamily};
