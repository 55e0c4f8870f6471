//! AOP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the AOP network workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`AopError`] and the [`Result`] alias used by the
//!   model and query crates
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`], the
//!   single place where the `tracing` subscriber is installed
//!
//! # Example
//!
//! ```no_run
//! use aop_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder().level(LogLevel::Debug).build();
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("logging ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{AopError, Result};
