//! One run of the tool: log in, perform the requested action, log out.

use std::io::Write;

use anyhow::Result;
use log::{error, info};

use crate::client::{ConsoleSession, Connector, SiteApi};
use crate::config::{Action, RunConfig};
use crate::context::RunContext;
use crate::error_handling::ConfigError;
use crate::import::{import_sites, ImportReport};
use crate::lister::{list_sites, ListReport};

/// Everything went through.
pub const EXIT_SUCCESS: i32 = 0;
/// Usage error, login failure, or an error that stopped the action.
pub const EXIT_FAILURE: i32 = 1;
/// The action finished but some sites or rows failed.
pub const EXIT_PARTIAL: i32 = 2;

/// Result of a completed action.
#[derive(Debug)]
pub enum RunOutcome {
    Listed(ListReport),
    Imported(ImportReport),
}

impl RunOutcome {
    pub fn has_failures(&self) -> bool {
        match self {
            RunOutcome::Listed(report) => report.has_failures(),
            RunOutcome::Imported(report) => report.has_failures(),
        }
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            EXIT_PARTIAL
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Logs in to the console named by `config` and runs its action.
///
/// Prints `Login Successful` or `Login Failure` to `out`. Nothing else is
/// attempted after a failed login.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the login fails, or
/// the action stops early (see [`run_with_session`]).
pub async fn run<W: Write>(config: &RunConfig, password: &str, out: &mut W) -> Result<RunOutcome> {
    let connector = Connector::from_config(config)?;
    info!("Connecting to {}", connector.base_url());

    let mut session = match connector.connect(&config.username, password).await {
        Ok(session) => session,
        Err(e) => {
            error!("Login to {} as {} failed: {}", config.host, config.username, e);
            writeln!(out, "Login Failure")?;
            return Err(e.into());
        }
    };
    writeln!(out, "Login Successful")?;

    run_with_session(&mut session, config, out).await
}

/// Runs the configured action on an authenticated session, then logs the
/// session out whether or not the action succeeded.
///
/// # Errors
///
/// Returns an error if the action cannot run to completion: the site listing
/// cannot be fetched, the CSV cannot be read, or `out` cannot be written.
pub async fn run_with_session<S: ConsoleSession, W: Write>(
    session: &mut S,
    config: &RunConfig,
    out: &mut W,
) -> Result<RunOutcome> {
    let result = perform(&*session, config, out).await;
    session.logout();
    result
}

async fn perform<A: SiteApi, W: Write>(
    api: &A,
    config: &RunConfig,
    out: &mut W,
) -> Result<RunOutcome> {
    let ctx = RunContext::new(api, config.username.as_str(), config.error_policy);
    match config.action {
        Action::List => Ok(RunOutcome::Listed(list_sites(&ctx, out).await?)),
        Action::Import => {
            let path = config.csv_path.as_deref().ok_or(ConfigError::MissingFile)?;
            Ok(RunOutcome::Imported(import_sites(&ctx, path, out).await?))
        }
    }
}
