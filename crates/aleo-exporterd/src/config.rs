use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use aleo_fetch::{Credentials, DEFAULT_RPC_METHOD, FetchConfig};
use aleo_model::{PayloadFormat, PayloadFormatError};
use aleo_observe::{LoggerConfig, LoggerError, LoggerFormat};
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use thiserror::Error;

pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ALEO_RPC_ENDPOINT is not set")]
    MissingEndpoint,

    #[error("invalid node endpoint {0:?}: expected an http(s) URL")]
    InvalidEndpoint(String),

    #[error("invalid payload format: {0}")]
    InvalidFormat(#[from] PayloadFormatError),

    #[error("invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("invalid metrics path {0:?}: must be a literal path starting with '/' other than '/'")]
    InvalidMetricsPath(String),

    #[error("invalid logger settings: {0}")]
    Logger(#[from] LoggerError),
}

/// Command line of `aleo-exporterd`. Node access settings also read the environment.
#[derive(Debug, Parser)]
#[command(name = "aleo-exporterd", version, about = "Prometheus exporter for Aleo nodes")]
pub struct Args {
    /// Address to listen on for telemetry. A bare `:port` binds `[::]:port`.
    #[arg(long = "web.listen-address", default_value = ":9200")]
    pub listen_address: String,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub telemetry_path: String,

    /// Append the exporter's own scrape metrics to the node metrics.
    #[arg(long = "web.include-exporter-metrics")]
    pub include_exporter_metrics: bool,

    /// Node request timeout in seconds.
    #[arg(
        long = "rpc.timeout",
        value_name = "SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rpc_timeout: u64,

    /// Largest node response accepted, in bytes.
    #[arg(long = "rpc.max-body-bytes", default_value_t = 4 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Node status API URL.
    #[arg(long = "rpc.endpoint", env = "ALEO_RPC_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long = "rpc.username", env = "ALEO_RPC_USERNAME")]
    pub username: Option<String>,

    #[arg(long = "rpc.password", env = "ALEO_RPC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Payload format served by the node: json, json-rpc or xml.
    #[arg(long = "rpc.format", env = "ALEO_RPC_FORMAT", default_value = "json-rpc")]
    pub format: String,

    /// JSON-RPC method returning the node state.
    #[arg(long = "rpc.method", env = "ALEO_RPC_METHOD", default_value = DEFAULT_RPC_METHOD)]
    pub method: String,

    /// Validate the node's TLS certificate. A bare flag means `true`.
    #[arg(
        long = "rpc.tls-verify",
        env = "ALEO_RPC_TLS_VERIFY",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub tls_verify: bool,

    /// Log filter directives.
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,

    /// Log output: text, json or journald.
    #[arg(long = "log.format", default_value = "text")]
    pub log_format: String,

    /// Dotenv file loaded before the environment is read.
    #[arg(long = "env-file", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,
}

/// Locate `--env-file` ahead of the full parse, which needs the file loaded first.
pub fn env_file_from<I>(args: I) -> PathBuf
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some(arg) = arg.to_str() else { continue };
        if arg == "--env-file" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--env-file=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(DEFAULT_ENV_FILE)
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen: SocketAddr,
    pub metrics_path: String,
    pub include_exporter_metrics: bool,
    pub fetch: FetchConfig,
    pub logger: LoggerConfig,
}

impl TryFrom<Args> for ExporterConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let endpoint = args
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        validate_endpoint(&endpoint)?;

        let credentials = match (args.username, args.password) {
            (None, None) => None,
            (username, password) => Some(Credentials {
                username: username.unwrap_or_default(),
                password,
            }),
        };

        let fetch = FetchConfig {
            endpoint,
            credentials,
            format: args.format.parse::<PayloadFormat>()?,
            rpc_method: args.method,
            tls_verify: args.tls_verify,
            timeout: Duration::from_secs(args.rpc_timeout),
            max_body_bytes: args.max_body_bytes,
        };

        if !aleo_api::is_literal_metrics_path(&args.telemetry_path) {
            return Err(ConfigError::InvalidMetricsPath(args.telemetry_path));
        }

        let logger = LoggerConfig {
            format: args.log_format.parse::<LoggerFormat>()?,
            level: args.log_level,
            ..Default::default()
        };

        Ok(Self {
            listen: parse_listen_address(&args.listen_address)?,
            metrics_path: args.telemetry_path,
            include_exporter_metrics: args.include_exporter_metrics,
            fetch,
            logger,
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|_| ConfigError::InvalidEndpoint(endpoint.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidEndpoint(endpoint.to_string())),
    }
}

/// `:9200` binds the IPv6 wildcard, which also accepts IPv4 on dual-stack hosts.
/// Anything else must be a literal `ip:port`.
fn parse_listen_address(raw: &str) -> Result<SocketAddr, ConfigError> {
    let addr = match raw.strip_prefix(':') {
        Some(port) => format!("[::]:{port}"),
        None => raw.to_string(),
    };
    addr.parse()
        .map_err(|_| ConfigError::InvalidListenAddress(raw.to_string()))
}
