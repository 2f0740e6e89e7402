//! nexpose_bulk library: bulk site administration for a Nexpose console
//!
//! This library logs in to a Nexpose / InsightVM console over its REST API and
//! either lists every site with its alert configuration, or creates sites in
//! bulk from the rows of a CSV file.
//!
//! # Example
//!
//! ```no_run
//! use nexpose_bulk::{run, Action, RunConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig {
//!     action: Action::Import,
//!     username: "nxadmin".to_string(),
//!     host: "console.example.com".to_string(),
//!     csv_path: Some(std::path::PathBuf::from("sites.csv")),
//!     ..Default::default()
//! };
//!
//! let outcome = run(&config, "secret", &mut std::io::stdout()).await?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod cli;
pub mod client;
pub mod config;
mod context;
pub mod credentials;
pub mod error_handling;
pub mod import;
pub mod initialization;
pub mod lister;
pub mod models;
mod run;

// Re-export public API
pub use client::{ConsoleSession, Connector, Session, SiteApi};
pub use config::{Action, ErrorPolicy, LogFormat, LogLevel, RunConfig};
pub use context::RunContext;
pub use import::{import_sites, ImportReport};
pub use lister::{list_sites, ListReport};
pub use run::{run, run_with_session, RunOutcome, EXIT_FAILURE, EXIT_PARTIAL, EXIT_SUCCESS};
