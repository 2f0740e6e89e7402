//! Site listing.
//!
//! Prints every site visible to the session with its scan template and the
//! full configuration of each of its alerts. A site that fails to load is
//! reported and skipped; the listing carries on with the next one.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use log::{error, info};

use crate::client::SiteApi;
use crate::config::LISTING_SEPARATOR;
use crate::context::RunContext;
use crate::models::{AlertConfig, AlertVariant, SiteId, SiteSummary};

/// Outcome of a listing run.
#[derive(Debug, Default)]
pub struct ListReport {
    /// Sites printed in full
    pub listed: usize,
    /// Sites that could not be loaded, with the reason
    pub failed: Vec<(SiteId, String)>,
}

impl ListReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Lists every site and its alerts to `out`.
///
/// # Errors
///
/// Returns an error if the site listing itself cannot be fetched or `out`
/// cannot be written. Failures loading individual sites are recorded in the
/// returned [`ListReport`] instead.
pub async fn list_sites<A: SiteApi, W: Write>(
    ctx: &RunContext<'_, A>,
    out: &mut W,
) -> Result<ListReport> {
    writeln!(out, "Listing Sites...")?;

    let sites = ctx
        .api
        .list_sites()
        .await
        .context("Failed to fetch the site listing")?;
    info!("{} sites visible to {}", sites.len(), ctx.username);

    let mut report = ListReport::default();
    for site_ref in sites {
        match ctx.api.load_site(site_ref.id).await {
            Ok(site) => {
                out.write_all(render_site(&site).as_bytes())
                    .context("Failed to write site listing")?;
                report.listed += 1;
            }
            Err(e) => {
                error!("Failed to load site {} ('{}'): {}", site_ref.id, site_ref.name, e);
                writeln!(out, "{}", LISTING_SEPARATOR)?;
                writeln!(out, "Failed to load site {}: {}", site_ref.id, e)?;
                report.failed.push((site_ref.id, e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Renders one site and all of its alerts.
pub fn render_site(site: &SiteSummary) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(text, "{}", LISTING_SEPARATOR);
    let _ = writeln!(text, "Loaded Site ID {}", site.id);
    let _ = writeln!(text, "Site Name {}.", site.name);
    let _ = writeln!(text, "Description {}.", site.description);
    let _ = writeln!(text, "Scan Template ID - {}.", site.scan_template_id);
    let _ = writeln!(text, "Scan Template Name - {}.", site.scan_template_name);
    for alert in &site.alerts {
        text.push_str(&render_alert(alert));
    }
    text
}

/// Renders one alert: state, enabled filters in fixed order, and the
/// settings of its notification type.
pub fn render_alert(alert: &AlertConfig) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "Alert {} is {} with {} max alerts",
        alert.name,
        if alert.enabled { "Enabled" } else { "Disabled" },
        alert.max_alerts
    );

    let _ = writeln!(text, "Scan Filters enabled are: ");
    for event in alert.scan_filter.enabled() {
        let _ = writeln!(text, "   {}", event.as_ref());
    }

    let _ = writeln!(text, "Vulnerability Filters enabled are: ");
    for event in alert.vuln_filter.enabled() {
        let _ = writeln!(text, "   {}", event.as_ref());
    }

    match &alert.variant {
        AlertVariant::Smtp {
            sender,
            server,
            recipients,
        } => {
            let _ = writeln!(
                text,
                "SMTP Alert with sender {} for server {} with recipients {}",
                sender,
                server,
                recipients.join(", ")
            );
        }
        AlertVariant::Snmp { community, server } => {
            let _ = writeln!(
                text,
                "SNMP Alert with community {} for server {}",
                community, server
            );
        }
        AlertVariant::Syslog { server } => {
            let _ = writeln!(text, "Syslog Alert with server {}", server);
        }
        AlertVariant::Other { .. } => {}
    }
    text
}
