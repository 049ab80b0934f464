//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the meeting sync engine:
//! - Logging and tracing initialisation
//! - Run configuration with fail-fast validation
//!
//! ## Overview
//!
//! Every other crate in the workspace logs through `tracing` and reads its
//! settings from [`config::SyncConfig`]. A configuration error is the only
//! failure that aborts a whole sync run.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{FetchConfig, SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
