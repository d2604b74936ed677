use aleo_fetch::FetchError;
use aleo_model::{ChannelState, NodeState};
use tracing::warn;

use crate::schema::{LABEL_CHANNEL, LABEL_STATUS, LABEL_TYPE, MetricKind, MetricSchema};
use crate::scrape::{Observation, Scrape};

/// Outcome of one fetch: exactly one of the two per scrape.
#[derive(Debug)]
pub enum ScrapeResult {
    Up(NodeState),
    Down(FetchError),
}

impl ScrapeResult {
    pub fn is_up(&self) -> bool {
        matches!(self, ScrapeResult::Up(_))
    }
}

impl From<Result<NodeState, FetchError>> for ScrapeResult {
    fn from(result: Result<NodeState, FetchError>) -> Self {
        match result {
            Ok(state) => ScrapeResult::Up(state),
            Err(err) => ScrapeResult::Down(err),
        }
    }
}

/// Map a fetch outcome onto the schema.
///
/// `up` comes first. A down target yields nothing else. Otherwise every declared
/// metric follows in schema order, channel-scoped ones once per channel.
pub fn translate(schema: &MetricSchema, result: &ScrapeResult) -> Scrape {
    let state = match result {
        ScrapeResult::Up(state) => state,
        ScrapeResult::Down(_) => {
            return Scrape::new(vec![Observation::new(MetricKind::Up, vec![], 0.0)]);
        }
    };

    let mut observations = vec![Observation::new(MetricKind::Up, vec![], 1.0)];
    for spec in schema.specs() {
        match spec.kind {
            MetricKind::Up => {}
            MetricKind::Type => observations.push(Observation::new(
                MetricKind::Type,
                vec![(LABEL_TYPE, state.node_type().to_string())],
                1.0,
            )),
            kind => {
                observations.extend(
                    state
                        .channels()
                        .iter()
                        .filter_map(|(channel, ch)| channel_observation(kind, channel, ch)),
                );
            }
        }
    }
    Scrape::new(observations)
}

fn channel_observation(
    kind: MetricKind,
    channel: Option<&str>,
    ch: &ChannelState,
) -> Option<Observation> {
    let mut labels = Vec::with_capacity(2);
    if let Some(name) = channel {
        labels.push((LABEL_CHANNEL, name.to_string()));
    }

    let raw = match kind {
        MetricKind::Status => {
            labels.push((LABEL_STATUS, ch.status.clone()));
            return Some(Observation::new(kind, labels, 1.0));
        }
        MetricKind::ConnectedSyncNodes => ch.connected_sync_nodes,
        MetricKind::ConnectedPeers => ch.connected_peers,
        MetricKind::CandidatePeers => ch.candidate_peers,
        MetricKind::CumulativeWeight => ch.cumulative_weight,
        MetricKind::LatestBlockHeight => ch.latest_block_height,
        MetricKind::BlocksMined => ch.mined_blocks.after_threshold,
        MetricKind::BlocksMinedCalibrate => ch.mined_blocks.before_threshold,
        MetricKind::Up | MetricKind::Type => return None,
    };
    Some(Observation::new(kind, labels, clamp(kind, channel, raw)))
}

/// Counts are never negative; an upstream reporting one gets a zero and a warning.
fn clamp(kind: MetricKind, channel: Option<&str>, raw: i64) -> f64 {
    if raw < 0 {
        warn!(
            metric = ?kind,
            channel = channel.unwrap_or("-"),
            value = raw,
            "negative count reported by upstream, clamped to zero"
        );
        return 0.0;
    }
    raw as f64
}
