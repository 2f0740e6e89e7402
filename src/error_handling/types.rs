//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::models::SiteId;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The host/port pair does not form a valid console URL.
    #[error("Invalid console address '{address}': {source}")]
    BaseUrlError {
        address: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors in the command line. All of them end the run before any prompt or
/// connection.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing action!")]
    MissingAction,

    #[error("Only one action may be given: --import or --list")]
    ConflictingActions,

    #[error("Missing user!")]
    MissingUsername,

    #[error("Missing server!")]
    MissingServer,

    #[error("Missing file argument!")]
    MissingFile,

    /// Rejected by the argument parser, or a help/version request.
    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl ConfigError {
    /// Process exit code for this error.
    ///
    /// Help and version output are reported by clap as errors but exit 0; every
    /// other configuration problem exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Usage(e) if e.exit_code() == 0 => 0,
            _ => 1,
        }
    }

    /// Whether the operator should be pointed at `--help`.
    pub fn wants_help_hint(&self) -> bool {
        !matches!(self, ConfigError::Usage(_))
    }
}

/// Login failures.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The console answered but refused the credentials.
    #[error("console at {host} rejected the credentials (HTTP {status})")]
    Rejected { host: String, status: u16 },

    /// The console answered with something other than success or refusal.
    #[error("console at {host} answered the login with HTTP {status}")]
    Unexpected { host: String, status: u16 },

    /// The console could not be reached.
    #[error("cannot reach console at {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: ReqwestError,
    },

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] InitializationError),
}

/// Failure of a single remote API call.
///
/// Every variant names the resource that was being read or written so the
/// operator can tell which site or request failed.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The console returned a non-success status.
    #[error("{resource} failed with HTTP {status}{}", format_message(.message))]
    Status {
        resource: String,
        status: u16,
        message: Option<String>,
    },

    /// The request did not complete.
    #[error("{resource} failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: ReqwestError,
    },

    /// The response body was not what the API documents.
    #[error("{resource} returned an unexpected body: {source}")]
    Decode {
        resource: String,
        #[source]
        source: ReqwestError,
    },

    /// The request URL could not be built from the console base URL.
    #[error("{resource}: invalid request URL: {source}")]
    Url {
        resource: String,
        #[source]
        source: url::ParseError,
    },

    /// A new site was created but a later step failed and the site could
    /// not be removed again.
    #[error("site {site} was created but left incomplete: {source}")]
    Incomplete {
        site: SiteId,
        #[source]
        source: Box<RemoteError>,
    },

    /// The session was logged out (or never logged in).
    #[error("session is not authenticated")]
    NotAuthenticated,
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

/// A CSV row that cannot be turned into a site definition.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed CSV row: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "unknown schedule '{0}' (expected daily, hourly, weekly, monthly-date or monthly-day)"
    )]
    UnknownSchedule(String),

    #[error("cannot parse date_time '{0}'")]
    InvalidDate(String),

    #[error("{column} '{value}' is not a site id")]
    InvalidSiteId { column: &'static str, value: String },
}

/// Failure of one import row.
#[derive(Error, Debug)]
pub enum RowError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot load alerts from site {site}: {source}")]
    CloneSource {
        site: SiteId,
        #[source]
        source: RemoteError,
    },

    #[error("cannot save site: {0}")]
    Save(#[source] RemoteError),
}

/// Failures that stop the importer before or between rows.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot read CSV file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV header is missing column '{0}' (see --template)")]
    MissingColumn(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_exit_codes() {
        assert_eq!(ConfigError::MissingAction.exit_code(), 1);
        assert_eq!(ConfigError::MissingUsername.exit_code(), 1);
        assert_eq!(ConfigError::MissingFile.exit_code(), 1);
        assert_eq!(ConfigError::ConflictingActions.exit_code(), 1);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::MissingAction.to_string(), "Missing action!");
        assert_eq!(ConfigError::MissingUsername.to_string(), "Missing user!");
        assert_eq!(ConfigError::MissingFile.to_string(), "Missing file argument!");
    }

    #[test]
    fn test_remote_status_error_names_resource() {
        let err = RemoteError::Status {
            resource: "GET site 12".to_string(),
            status: 404,
            message: Some("Not Found".to_string()),
        };
        assert_eq!(err.to_string(), "GET site 12 failed with HTTP 404: Not Found");

        let err = RemoteError::Status {
            resource: "POST /api/3/sites".to_string(),
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "POST /api/3/sites failed with HTTP 500");
    }

    #[test]
    fn test_incomplete_site_message_names_site() {
        let err = RemoteError::Incomplete {
            site: SiteId(42),
            source: Box::new(RemoteError::NotAuthenticated),
        };
        assert_eq!(
            err.to_string(),
            "site 42 was created but left incomplete: session is not authenticated"
        );
    }

    #[test]
    fn test_row_error_clone_source_message() {
        let err = RowError::CloneSource {
            site: SiteId(9),
            source: RemoteError::NotAuthenticated,
        };
        assert_eq!(
            err.to_string(),
            "cannot load alerts from site 9: session is not authenticated"
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::UnknownSchedule("yearly".to_string());
        assert!(err.to_string().contains("'yearly'"));

        let err = ParseError::InvalidSiteId {
            column: "alerts_id",
            value: "x1".to_string(),
        };
        assert_eq!(err.to_string(), "alerts_id 'x1' is not a site id");
    }
}
