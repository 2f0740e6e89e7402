//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (API paths, defaults, the CSV header)
//! - Run configuration types shared by the CLI and the library

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Action, ErrorPolicy, LogFormat, LogLevel, RunConfig};
