use prometheus::{Encoder, TextEncoder, proto::MetricFamily};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metric not declared in schema: {0}")]
    UnknownMetric(String),

    #[error("label {label} not declared for {metric}")]
    UnexpectedLabel { metric: String, label: String },

    #[error("observations of {0} carry different label sets")]
    InconsistentLabels(String),

    #[error("duplicate series for {0}")]
    DuplicateSeries(String),

    #[error("encoded metrics are not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render families in the Prometheus text format, preserving their order.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, EncodeError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::with_capacity(1024);
    encoder.encode(families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(encode_text(&[]).unwrap(), "");
    }
}
