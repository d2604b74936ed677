use aleo_model::{NodeState, PayloadFormat};

use crate::errors::DecodeError;

mod json;
pub use json::{JsonDecoder, JsonRpcDecoder};
pub(crate) use json::RpcRequest;

mod xml;
pub use xml::XmlDecoder;

/// Turns a raw response body into a [`NodeState`].
///
/// One implementation per [`PayloadFormat`], chosen once at startup.
pub trait Decoder: Send + Sync + 'static {
    /// Value sent in the `Accept` header.
    fn content_type(&self) -> &'static str;

    fn decode(&self, body: &[u8]) -> Result<NodeState, DecodeError>;
}

/// Select the decoder for a payload format.
pub fn decoder_for(format: PayloadFormat) -> Box<dyn Decoder> {
    match format {
        PayloadFormat::Json => Box::new(JsonDecoder),
        PayloadFormat::JsonRpc => Box::new(JsonRpcDecoder),
        PayloadFormat::Xml => Box::new(XmlDecoder),
    }
}
