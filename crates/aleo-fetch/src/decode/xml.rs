use aleo_model::{ChannelSet, ChannelState, MinedBlocks, NodeState};
use serde::Deserialize;

use crate::decode::Decoder;
use crate::errors::DecodeError;

/// `<nodeState>` document with one `<channel>` element per logical channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl Decoder for XmlDecoder {
    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn decode(&self, body: &[u8]) -> Result<NodeState, DecodeError> {
        let wire: XmlNodeState = quick_xml::de::from_reader(body)?;

        let channels = wire
            .channels
            .into_iter()
            .map(|ch| {
                let state = ChannelState {
                    status: ch.status,
                    connected_sync_nodes: ch.connected_sync_nodes,
                    connected_peers: ch.connected_peers,
                    candidate_peers: ch.candidate_peers,
                    cumulative_weight: ch.cumulative_weight,
                    latest_block_height: ch.latest_block_height,
                    mined_blocks: MinedBlocks::from_heights(ch.mined_blocks),
                };
                (ch.name, state)
            })
            .collect();

        Ok(NodeState::new(wire.node_type, ChannelSet::Named(channels))?)
    }
}

#[derive(Debug, Deserialize)]
struct XmlNodeState {
    #[serde(rename = "type")]
    node_type: String,
    #[serde(rename = "channel", default)]
    channels: Vec<XmlChannel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XmlChannel {
    name: String,
    status: String,
    connected_sync_nodes: i64,
    connected_peers: i64,
    candidate_peers: i64,
    cumulative_weight: i64,
    latest_block_height: i64,
    #[serde(rename = "minedBlock", default)]
    mined_blocks: Vec<i64>,
}
