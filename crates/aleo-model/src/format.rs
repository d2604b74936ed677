use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid payload format: {0} (expected: json|json-rpc|xml)")]
pub struct PayloadFormatError(pub String);

/// Wire format of the upstream status API, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadFormat {
    /// Plain `GET` returning a bare JSON object.
    Json,
    /// JSON-RPC 2.0 over `POST`.
    #[default]
    JsonRpc,
    /// Plain `GET` returning an XML document with per-channel elements.
    Xml,
}

impl PayloadFormat {
    /// Whether the request carries a body and is sent with `POST`.
    pub fn is_rpc(&self) -> bool {
        matches!(self, PayloadFormat::JsonRpc)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadFormat::Json => "json",
            PayloadFormat::JsonRpc => "json-rpc",
            PayloadFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadFormat {
    type Err = PayloadFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "json" => Ok(PayloadFormat::Json),
            "json-rpc" | "jsonrpc" | "rpc" => Ok(PayloadFormat::JsonRpc),
            "xml" => Ok(PayloadFormat::Xml),
            _ => Err(PayloadFormatError(s.to_string())),
        }
    }
}
