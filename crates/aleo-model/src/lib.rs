mod constants;
pub use constants::{BLOCK_HEIGHT_THRESHOLD, NAMESPACE};

mod channel;
pub use channel::{ChannelSet, ChannelState, MinedBlocks};

mod node_state;
pub use node_state::{NodeState, NodeStateError};

mod format;
pub use format::{PayloadFormat, PayloadFormatError};

/// Name of a logical channel reported by the upstream.
///
/// Becomes the value of the `channel` label on channel-scoped metrics.
pub type ChannelName = String;
