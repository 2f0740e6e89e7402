//! Command-line argument parsing.
//!
//! Turns the process arguments into an [`Invocation`]: either a request to
//! print the CSV template, or a validated [`RunConfig`].

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    Action, ErrorPolicy, LogFormat, LogLevel, RunConfig, CSV_TEMPLATE_HEADER, DEFAULT_PORT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error_handling::ConfigError;

/// Nexpose Bulk Site Creator
#[derive(Debug, Parser)]
#[command(
    name = "nexpose_bulk",
    version,
    about = "Nexpose Bulk Site Creator",
    after_help = "One action (--import or --list) is mandatory."
)]
pub struct Args {
    /// Action: bulk import sites from a CSV file
    #[arg(short = 'i', long = "import")]
    pub import: bool,

    /// Action: list sites and their alerts
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Console username
    #[arg(short = 'u', long = "username", value_name = "NAME")]
    pub username: Option<String>,

    /// Console host
    #[arg(short = 's', long = "server", value_name = "HOST")]
    pub server: Option<String>,

    /// Console port
    #[arg(short = 'p', long = "port", value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// CSV file to import
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Display the CSV file template and exit
    #[arg(short = 't', long = "template")]
    pub template: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Accept a self-signed or otherwise invalid console certificate
    #[arg(long)]
    pub insecure: bool,

    /// What to do when an import row fails
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Continue)]
    pub on_error: ErrorPolicy,
}

/// What the process was asked to do.
#[derive(Debug)]
pub enum Invocation {
    /// Print the CSV template and exit
    ShowTemplate,
    /// Log in and perform an action
    Run(RunConfig),
}

/// Parses the full argument list (program name first).
///
/// `-t`/`--template` wins over everything else on the command line, even
/// arguments that would otherwise be rejected.
///
/// # Errors
///
/// Returns a [`ConfigError`] for a malformed command line, a missing or
/// conflicting action, a missing username or server, or an import without a
/// file. Help and version requests also come back as `ConfigError::Usage`,
/// with exit code 0.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if requests_template(&args) {
        return Ok(Invocation::ShowTemplate);
    }
    Args::try_parse_from(args)?.into_invocation()
}

fn requests_template(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|a| a.as_os_str() != "--")
        .filter_map(|a| a.to_str())
        .any(|a| a == "--template" || is_short_cluster_with_t(a))
}

/// `-t` alone or inside a cluster of short flags such as `-it`.
fn is_short_cluster_with_t(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(flags) if !flags.starts_with('-') => {
            flags.contains('t') && flags.chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

impl Args {
    /// Validates the parsed flags into an [`Invocation`].
    pub fn into_invocation(self) -> Result<Invocation, ConfigError> {
        if self.template {
            return Ok(Invocation::ShowTemplate);
        }

        let action = match (self.import, self.list) {
            (true, true) => return Err(ConfigError::ConflictingActions),
            (true, false) => Action::Import,
            (false, true) => Action::List,
            (false, false) => return Err(ConfigError::MissingAction),
        };

        let username = self
            .username
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingUsername)?;
        let host = self
            .server
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingServer)?;

        if action == Action::Import && self.file.is_none() {
            return Err(ConfigError::MissingFile);
        }

        Ok(Invocation::Run(RunConfig {
            action,
            username,
            host,
            port: self.port,
            csv_path: self.file,
            log_level: self.log_level,
            log_format: self.log_format,
            timeout_seconds: self.timeout_seconds,
            accept_invalid_certs: self.insecure,
            error_policy: self.on_error,
        }))
    }
}

/// Writes the CSV template shown by `--template`.
pub fn write_template<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Use this header in your CSV file")?;
    writeln!(out)?;
    writeln!(out, "{}", CSV_TEMPLATE_HEADER)
}
