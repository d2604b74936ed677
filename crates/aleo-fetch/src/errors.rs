use aleo_model::NodeStateError;
use thiserror::Error;

/// Payload could not be turned into a complete node state.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid xml payload: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("json-rpc response has neither result nor error")]
    MissingResult,

    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("incomplete node state: {0}")]
    Invalid(#[from] NodeStateError),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

/// Outcome of a failed fetch. Never fatal for the process.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("target unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    UpstreamError(u16),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Short stable tag for logs and metric labels.
    pub fn cause(&self) -> &'static str {
        match self {
            FetchError::Unreachable(_) => "unreachable",
            FetchError::UpstreamError(_) => "upstream",
            FetchError::Decode(DecodeError::Rpc { .. }) => "rpc",
            FetchError::Decode(_) => "decode",
        }
    }
}

/// The shared HTTP client could not be built.
#[derive(Error, Debug)]
#[error("failed to build http client: {0}")]
pub struct ClientError(#[from] pub reqwest::Error);
