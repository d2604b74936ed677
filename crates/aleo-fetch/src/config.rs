use std::{fmt, time::Duration};

use aleo_model::PayloadFormat;

/// Default JSON-RPC method queried on the node.
pub const DEFAULT_RPC_METHOD: &str = "getnodestate";

/// HTTP Basic credentials for the node endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Full URL of the node status API.
    pub endpoint: String,
    /// Basic auth; `None` sends the request unauthenticated.
    pub credentials: Option<Credentials>,
    pub format: PayloadFormat,
    /// Method name for [`PayloadFormat::JsonRpc`]; ignored otherwise.
    pub rpc_method: String,
    /// Validate the upstream certificate chain. Off by default: nodes commonly
    /// serve self-signed certificates on internal networks.
    pub tls_verify: bool,
    /// Deadline for the whole request, body included.
    pub timeout: Duration,
    /// Upper bound for the response body.
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3030".to_string(),
            credentials: None,
            format: PayloadFormat::default(),
            rpc_method: DEFAULT_RPC_METHOD.to_string(),
            tls_verify: false,
            timeout: Duration::from_secs(10),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}
