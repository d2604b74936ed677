use serde::{Deserialize, Serialize};

use crate::{BLOCK_HEIGHT_THRESHOLD, ChannelName};

/// Mined block counts split by [`BLOCK_HEIGHT_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedBlocks {
    /// Blocks mined below the threshold height.
    pub before_threshold: i64,
    /// Blocks mined at or above the threshold height.
    pub after_threshold: i64,
}

impl MinedBlocks {
    /// Count mined block heights on each side of the threshold.
    pub fn from_heights<I>(heights: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        heights
            .into_iter()
            .fold(MinedBlocks::default(), |mut acc, height| {
                if height < BLOCK_HEIGHT_THRESHOLD {
                    acc.before_threshold += 1;
                } else {
                    acc.after_threshold += 1;
                }
                acc
            })
    }
}

/// State of a single logical channel of the node.
///
/// Counts are kept exactly as the upstream reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    pub status: String,
    pub connected_sync_nodes: i64,
    pub connected_peers: i64,
    pub candidate_peers: i64,
    pub cumulative_weight: i64,
    pub latest_block_height: i64,
    pub mined_blocks: MinedBlocks,
}

/// Channel breakdown of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelSet {
    /// The upstream does not group state by channel.
    Implicit(ChannelState),
    /// One entry per named channel; never empty, names unique.
    Named(Vec<(ChannelName, ChannelState)>),
}

impl ChannelSet {
    /// Number of channels (1 for the implicit channel).
    pub fn len(&self) -> usize {
        match self {
            ChannelSet::Implicit(_) => 1,
            ChannelSet::Named(channels) => channels.len(),
        }
    }

    /// Always `false` for a validated set; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(channel name, state)`; the implicit channel has no name.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Option<&str>, &ChannelState)> + '_> {
        match self {
            ChannelSet::Implicit(state) => Box::new(std::iter::once((None, state))),
            ChannelSet::Named(channels) => Box::new(
                channels
                    .iter()
                    .map(|(name, state)| (Some(name.as_str()), state)),
            ),
        }
    }
}
