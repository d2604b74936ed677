//! Log subscriber setup shared by the exporter binaries.
//!
//! ```rust,no_run
//! use aleo_observe::{LoggerConfig, LoggerFormat, logger_init};
//!
//! # fn main() -> Result<(), aleo_observe::LoggerError> {
//! let cfg = LoggerConfig {
//!     format: LoggerFormat::Json,
//!     level: "info,aleo_fetch=debug".to_string(),
//!     ..Default::default()
//! };
//! logger_init(&cfg)?;
//! # Ok(())
//! # }
//! ```

mod logger;
pub use logger::*;
