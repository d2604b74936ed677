//! Remote state fetcher for the Aleo node exporter.
//!
//! A [`Fetcher`] issues one HTTP request per call to the configured node endpoint,
//! reads a bounded response body and decodes it into a [`aleo_model::NodeState`]
//! with the [`Decoder`] selected for the deployment's [`aleo_model::PayloadFormat`].
//!
//! No retries are performed here. Every failure is returned as a [`FetchError`].

mod config;
pub use config::{Credentials, DEFAULT_RPC_METHOD, FetchConfig};

mod errors;
pub use errors::{ClientError, DecodeError, FetchError};

mod decode;
pub use decode::{Decoder, JsonDecoder, JsonRpcDecoder, XmlDecoder, decoder_for};

mod client;
pub use client::{Fetcher, build_client};

mod source;
pub use source::StateSource;
