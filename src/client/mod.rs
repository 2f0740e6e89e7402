//! Console session client.
//!
//! [`Connector`] performs the login and yields a [`Session`]. The lister and the
//! importer only see the [`SiteApi`] trait, so they can run against any
//! implementation of it (tests use an in-memory one).

mod session;
mod wire;

use crate::error_handling::RemoteError;
use crate::models::{NewSite, SiteId, SiteRef, SiteSummary};

pub use session::{Connector, Session};

/// Site operations offered by an authenticated session.
#[allow(async_fn_in_trait)] // Only used through generics, never as a trait object
pub trait SiteApi {
    /// Every site in the account (id and name only).
    async fn list_sites(&self) -> Result<Vec<SiteRef>, RemoteError>;

    /// Full detail of one site, alerts included.
    async fn load_site(&self, id: SiteId) -> Result<SiteSummary, RemoteError>;

    /// Creates `site` on the console and returns its new id.
    async fn save_site(&self, site: &NewSite) -> Result<SiteId, RemoteError>;
}

/// Lifecycle of a session, on top of its site operations.
pub trait ConsoleSession: SiteApi {
    fn is_authenticated(&self) -> bool;

    /// Ends the session. Idempotent.
    fn logout(&mut self);
}
