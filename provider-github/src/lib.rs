//! # GitHub Provider
//!
//! Implements `ContentStore` on top of the GitHub repository contents API.
//!
//! Every file in a repository carries a blob `sha`. Replacing a file requires
//! sending the `sha` that was last read for it; GitHub answers `409`/`422`
//! when the token is missing or stale. That check is what makes overlapping
//! sync runs safe.

pub mod error;
pub mod store;
pub mod types;

pub use error::{GitHubError, Result};
pub use store::GitHubContentStore;
