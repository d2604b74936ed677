use std::collections::HashSet;

use aleo_model::NAMESPACE;
use thiserror::Error;

pub const LABEL_CHANNEL: &str = "channel";
pub const LABEL_TYPE: &str = "type";
pub const LABEL_STATUS: &str = "status";

/// Every gauge the exporter knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Up,
    Type,
    Status,
    ConnectedSyncNodes,
    ConnectedPeers,
    CandidatePeers,
    CumulativeWeight,
    LatestBlockHeight,
    BlocksMined,
    BlocksMinedCalibrate,
}

impl MetricKind {
    /// Whether the gauge is emitted once per channel.
    pub fn is_channel_scoped(&self) -> bool {
        !matches!(self, MetricKind::Up | MetricKind::Type)
    }
}

/// Static declaration of one gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub kind: MetricKind,
    /// Name without the namespace prefix.
    pub name: &'static str,
    pub help: &'static str,
    /// Every label the gauge may carry.
    pub labels: &'static [&'static str],
}

impl MetricSpec {
    pub const fn new(
        kind: MetricKind,
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            name,
            help,
            labels,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema has no up metric")]
    MissingUp,
    #[error("metric declared twice: {0}")]
    Duplicate(String),
    #[error("invalid metric name: {0}")]
    InvalidName(String),
    #[error("empty help for metric: {0}")]
    EmptyHelp(String),
}

/// Immutable table of the exported gauges, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSchema {
    namespace: String,
    specs: Vec<MetricSpec>,
}

impl MetricSchema {
    /// Validate and build a schema. Emission follows the order of `specs`.
    pub fn new(namespace: impl Into<String>, specs: Vec<MetricSpec>) -> Result<Self, SchemaError> {
        let namespace = namespace.into();
        if !is_valid_name(&namespace) {
            return Err(SchemaError::InvalidName(namespace));
        }

        let mut kinds = HashSet::new();
        let mut names = HashSet::new();
        for spec in &specs {
            if !is_valid_name(spec.name) {
                return Err(SchemaError::InvalidName(spec.name.to_string()));
            }
            if spec.help.trim().is_empty() {
                return Err(SchemaError::EmptyHelp(spec.name.to_string()));
            }
            if !kinds.insert(spec.kind) || !names.insert(spec.name) {
                return Err(SchemaError::Duplicate(spec.name.to_string()));
            }
        }
        if !kinds.contains(&MetricKind::Up) {
            return Err(SchemaError::MissingUp);
        }

        Ok(Self { namespace, specs })
    }

    /// The full node schema under the `aleo` namespace.
    pub fn aleo() -> Self {
        const CH: &[&str] = &[LABEL_CHANNEL];

        let specs = vec![
            MetricSpec::new(
                MetricKind::Up,
                "up",
                "Was the last query of the node successful.",
                &[],
            ),
            MetricSpec::new(MetricKind::Type, "type", "Type of node.", &[LABEL_TYPE]),
            MetricSpec::new(
                MetricKind::Status,
                "status",
                "Node status.",
                &[LABEL_CHANNEL, LABEL_STATUS],
            ),
            MetricSpec::new(
                MetricKind::ConnectedSyncNodes,
                "connected_sync_nodes",
                "Number of connected sync nodes.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::ConnectedPeers,
                "connected_peers",
                "Number of connected peers.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::CandidatePeers,
                "candidate_peers",
                "Number of candidate peers.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::CumulativeWeight,
                "cumulative_weight",
                "Cumulative weight of the canonical chain.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::LatestBlockHeight,
                "latest_block_height",
                "Latest block height of node.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::BlocksMined,
                "blocks_mined",
                "Blocks mined at or after block 18000.",
                CH,
            ),
            MetricSpec::new(
                MetricKind::BlocksMinedCalibrate,
                "blocks_mined_calibrate",
                "Blocks mined before block 18000.",
                CH,
            ),
        ];

        // Static table above is valid by construction.
        Self {
            namespace: NAMESPACE.to_string(),
            specs,
        }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricSpec> {
        self.specs.iter().find(|spec| spec.kind == kind)
    }

    /// `namespace_name`, as exposed.
    pub fn fq_name(&self, spec: &MetricSpec) -> String {
        format!("{}_{}", self.namespace, spec.name)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
