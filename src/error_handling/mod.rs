//! Error handling.
//!
//! This module provides the error taxonomy of a run:
//! - **Configuration** errors from the command line (fatal, exit 1)
//! - **Authentication** errors from the login (fatal, exit 1)
//! - **Remote** errors from individual API calls
//! - **Parse** errors from individual CSV rows
//!
//! Remote and parse errors raised while importing are wrapped in a [`RowError`]
//! and collected per row instead of aborting the whole run.

mod types;

// Re-export public API
pub use types::{
    AuthError, ConfigError, ImportError, InitializationError, ParseError, RemoteError, RowError,
};
