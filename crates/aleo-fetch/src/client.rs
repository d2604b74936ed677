use std::sync::Arc;

use aleo_model::NodeState;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header};
use tracing::{debug, trace, warn};

use crate::config::FetchConfig;
use crate::decode::{Decoder, RpcRequest, decoder_for};
use crate::errors::{ClientError, DecodeError, FetchError};
use crate::source::StateSource;

const USER_AGENT: &str = concat!("aleo-exporter/", env!("CARGO_PKG_VERSION"));

/// Build the pooled HTTP client shared by every scrape.
///
/// Certificate validation follows `config.tls_verify`; it is disabled by default.
pub fn build_client(config: &FetchConfig) -> Result<Client, ClientError> {
    let client = Client::builder()
        .danger_accept_invalid_certs(!config.tls_verify)
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Fetches one [`NodeState`] per call from the configured endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: Arc<FetchConfig>,
    decoder: Arc<dyn Decoder>,
}

impl Fetcher {
    /// Build a fetcher with its own client.
    pub fn new(config: FetchConfig) -> Result<Self, ClientError> {
        if !config.tls_verify {
            warn!(
                endpoint = %config.endpoint,
                "upstream TLS certificate validation is disabled"
            );
        }
        let client = build_client(&config)?;
        Ok(Self::with_client(client, config))
    }

    /// Build a fetcher on top of an existing client.
    pub fn with_client(client: Client, config: FetchConfig) -> Self {
        let decoder: Arc<dyn Decoder> = Arc::from(decoder_for(config.format));
        Self {
            client,
            config: Arc::new(config),
            decoder,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Issue one request and decode the response.
    pub async fn fetch(&self) -> Result<NodeState, FetchError> {
        let request = self.build_request();
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(endpoint = %self.config.endpoint, %status, "upstream answered with error status");
            return Err(FetchError::UpstreamError(status.as_u16()));
        }

        let body = read_bounded(response, self.config.max_body_bytes).await?;
        trace!(bytes = body.len(), format = %self.config.format, "decoding upstream payload");

        let state = self.decoder.decode(&body)?;
        Ok(state)
    }

    fn build_request(&self) -> RequestBuilder {
        let cfg = &self.config;
        let mut request = if cfg.format.is_rpc() {
            self.client
                .post(&cfg.endpoint)
                .json(&RpcRequest::new(&cfg.rpc_method))
        } else {
            self.client.get(&cfg.endpoint)
        };
        request = request.header(header::ACCEPT, self.decoder.content_type());

        if let Some(creds) = &cfg.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_deref());
        }
        request
    }
}

#[async_trait]
impl StateSource for Fetcher {
    async fn fetch(&self) -> Result<NodeState, FetchError> {
        Fetcher::fetch(self).await
    }

    fn target(&self) -> &str {
        &self.config.endpoint
    }
}

/// Read the whole body, failing as soon as it grows past `limit`.
async fn read_bounded(mut response: Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    let advertised = response.content_length();
    if let Some(len) = advertised
        && len > limit as u64
    {
        return Err(DecodeError::BodyTooLarge { limit }.into());
    }

    let capacity = advertised.map_or(0, |len| len as usize);
    let mut body = Vec::with_capacity(capacity);
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(DecodeError::BodyTooLarge { limit }.into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
