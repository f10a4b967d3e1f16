//! Folio Telemetry - Logging for Folio media services.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - Stdout, stderr, or rolling-file output
//! - Integration with the tracing ecosystem
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), folio_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("folio_token=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("media service starting");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
