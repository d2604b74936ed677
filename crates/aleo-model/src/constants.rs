/// Prefix carried by every exported metric name.
pub const NAMESPACE: &str = "aleo";

/// Block height splitting mined blocks into "calibrate" (below) and regular (at or above).
pub const BLOCK_HEIGHT_THRESHOLD: i64 = 18_000;
