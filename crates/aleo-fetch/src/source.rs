use aleo_model::NodeState;
use async_trait::async_trait;

use crate::errors::FetchError;

/// Anything that can produce one node snapshot per call.
///
/// Implemented by [`crate::Fetcher`]; the collector only depends on this trait.
#[async_trait]
pub trait StateSource: Send + Sync + 'static {
    /// Fetch and decode the current node state.
    async fn fetch(&self) -> Result<NodeState, FetchError>;

    /// Human-readable target, used in logs.
    fn target(&self) -> &str;
}
