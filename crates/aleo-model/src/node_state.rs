use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::{ChannelSet, ChannelState};

/// Errors raised when a decoded payload cannot form a complete [`NodeState`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeStateError {
    #[error("node type is empty")]
    EmptyNodeType,
    #[error("channel breakdown is empty")]
    NoChannels,
    #[error("channel name is empty")]
    EmptyChannelName,
    #[error("duplicate channel: {0}")]
    DuplicateChannel(String),
}

/// Snapshot of a remote node, produced by one successful fetch.
///
/// Only constructed through [`NodeState::new`], so every instance is fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeState {
    node_type: String,
    channels: ChannelSet,
}

impl NodeState {
    /// Build a validated node state.
    pub fn new(node_type: impl Into<String>, channels: ChannelSet) -> Result<Self, NodeStateError> {
        let node_type = node_type.into();
        if node_type.trim().is_empty() {
            return Err(NodeStateError::EmptyNodeType);
        }

        if let ChannelSet::Named(named) = &channels {
            if named.is_empty() {
                return Err(NodeStateError::NoChannels);
            }
            let mut seen = HashSet::with_capacity(named.len());
            for (name, _) in named {
                if name.trim().is_empty() {
                    return Err(NodeStateError::EmptyChannelName);
                }
                if !seen.insert(name.as_str()) {
                    return Err(NodeStateError::DuplicateChannel(name.clone()));
                }
            }
        }

        Ok(Self {
            node_type,
            channels,
        })
    }

    /// Shortcut for a node without a channel breakdown.
    pub fn single(
        node_type: impl Into<String>,
        state: ChannelState,
    ) -> Result<Self, NodeStateError> {
        Self::new(node_type, ChannelSet::Implicit(state))
    }

    #[inline]
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    #[inline]
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }
}
