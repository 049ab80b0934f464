//! # Google Drive Provider
//!
//! Implements `SourceProvider` for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Folder lookup by display name
//! - Paged file listing scoped to one folder and one source kind
//! - Plain-text export of native documents
//! - Raw and streaming reads of stored files
//!
//! Authentication is outside this crate: callers hand in a bearer token with
//! the `drive.readonly` scope.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GoogleDriveConnector;
pub use error::{GoogleDriveError, Result};
