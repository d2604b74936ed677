use aleo_model::{ChannelState, MinedBlocks, NodeState};
use serde::{Deserialize, Serialize};

use crate::decode::Decoder;
use crate::errors::DecodeError;

/// Bare JSON node state, served by a plain `GET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn decode(&self, body: &[u8]) -> Result<NodeState, DecodeError> {
        let wire: WireNodeState = serde_json::from_slice(body)?;
        wire.into_state()
    }
}

/// JSON-RPC 2.0 envelope whose `result` is the node state.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRpcDecoder;

impl Decoder for JsonRpcDecoder {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn decode(&self, body: &[u8]) -> Result<NodeState, DecodeError> {
        let response: RpcResponse = serde_json::from_slice(body)?;
        if let Some(err) = response.error {
            return Err(DecodeError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response
            .result
            .ok_or(DecodeError::MissingResult)?
            .into_state()
    }
}

/// Request body for [`aleo_model::PayloadFormat::JsonRpc`].
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: [(); 0],
}

impl<'a> RpcRequest<'a> {
    pub(crate) fn new(method: &'a str) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params: [],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<WireNodeState>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Peer fields are reported either as a count or as the list of peer addresses.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountOrList {
    Count(i64),
    List(Vec<serde_json::Value>),
}

impl CountOrList {
    fn count(&self) -> i64 {
        match self {
            CountOrList::Count(n) => *n,
            CountOrList::List(items) => i64::try_from(items.len()).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireNodeState {
    #[serde(rename = "type")]
    node_type: String,
    status: String,
    connected_sync_nodes: i64,
    connected_peers: CountOrList,
    candidate_peers: CountOrList,
    cumulative_weight: i64,
    latest_block_height: i64,
    /// Heights of blocks mined by this node.
    #[serde(default)]
    blocks_mined: Vec<i64>,
}

impl WireNodeState {
    fn into_state(self) -> Result<NodeState, DecodeError> {
        let channel = ChannelState {
            status: self.status,
            connected_sync_nodes: self.connected_sync_nodes,
            connected_peers: self.connected_peers.count(),
            candidate_peers: self.candidate_peers.count(),
            cumulative_weight: self.cumulative_weight,
            latest_block_height: self.latest_block_height,
            mined_blocks: MinedBlocks::from_heights(self.blocks_mined),
        };
        Ok(NodeState::single(self.node_type, channel)?)
    }
}
