//! Run context for site operations.
//!
//! This module defines the `RunContext` struct that groups what the lister and
//! the importer need from a run: the authenticated session and the options
//! that shape their behaviour.

use crate::client::SiteApi;
use crate::config::ErrorPolicy;

/// Context passed explicitly into every site operation of a run.
///
/// Built once, right after a successful login, and borrowed by the action.
pub struct RunContext<'a, A: SiteApi> {
    /// Authenticated session used for every remote call
    pub api: &'a A,
    /// Console user the session belongs to
    pub username: String,
    /// Behaviour when an import row fails
    pub error_policy: ErrorPolicy,
}

impl<'a, A: SiteApi> RunContext<'a, A> {
    /// Creates a new `RunContext` over `api`.
    pub fn new(api: &'a A, username: impl Into<String>, error_policy: ErrorPolicy) -> Self {
        Self {
            api,
            username: username.into(),
            error_policy,
        }
    }
}
