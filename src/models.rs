//! Domain types shared by the session client, the lister and the importer.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterMacro, EnumString};

/// Identifier of a site on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SiteId)
    }
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRef {
    pub id: SiteId,
    pub name: String,
}

/// Full detail of one site, as loaded for listing or alert cloning.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub id: SiteId,
    pub name: String,
    pub description: String,
    pub scan_template_id: String,
    pub scan_template_name: String,
    pub alerts: Vec<AlertConfig>,
}

/// Scan lifecycle events an alert can fire on.
///
/// Declaration order is the order flags are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ScanEvent {
    Start,
    Stop,
    Fail,
    Resume,
    Pause,
}

/// Vulnerability events an alert can fire on.
///
/// Declaration order is the order flags are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum VulnEvent {
    Severity,
    Confirmed,
    Unconfirmed,
    Potential,
}

/// Set of scan events an alert is enabled for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter(HashSet<ScanEvent>);

impl ScanFilter {
    pub fn contains(&self, event: ScanEvent) -> bool {
        self.0.contains(&event)
    }

    /// Enabled events in fixed declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = ScanEvent> + '_ {
        ScanEvent::iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<ScanEvent> for ScanFilter {
    fn from_iter<I: IntoIterator<Item = ScanEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Set of vulnerability events an alert is enabled for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VulnFilter(HashSet<VulnEvent>);

impl VulnFilter {
    pub fn contains(&self, event: VulnEvent) -> bool {
        self.0.contains(&event)
    }

    /// Enabled events in fixed declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = VulnEvent> + '_ {
        VulnEvent::iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<VulnEvent> for VulnFilter {
    fn from_iter<I: IntoIterator<Item = VulnEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Delivery mechanism of an alert and its variant-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertVariant {
    Smtp {
        sender: String,
        server: String,
        recipients: Vec<String>,
    },
    Snmp {
        community: String,
        server: String,
    },
    Syslog {
        server: String,
    },
    /// A notification type this tool does not know how to recreate.
    Other { kind: String },
}

/// One alert configured on a site.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    pub name: String,
    pub enabled: bool,
    pub max_alerts: u32,
    pub scan_filter: ScanFilter,
    pub vuln_filter: VulnFilter,
    /// Severity threshold reported by the console, when the severity filter is on.
    pub severity_threshold: Option<String>,
    pub variant: AlertVariant,
}

/// Recurrence of a scan schedule, keyed by the keyword used in the import CSV.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIterMacro, EnumString, Display, AsRefStr,
)]
pub enum ScheduleKind {
    #[strum(serialize = "daily")]
    Daily,
    #[strum(serialize = "hourly")]
    Hourly,
    #[strum(serialize = "weekly")]
    Weekly,
    #[strum(serialize = "monthly-date")]
    MonthlyDate,
    #[strum(serialize = "monthly-day")]
    MonthlyDay,
}

/// A recurring scan trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub kind: ScheduleKind,
    pub interval: u32,
    pub start: DateTime<Utc>,
}

impl Schedule {
    /// Schedule repeating every single period of `kind`, starting at `start`.
    pub fn every(kind: ScheduleKind, start: DateTime<Utc>) -> Self {
        Self {
            kind,
            interval: 1,
            start,
        }
    }
}

/// Write model for a site about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSite {
    pub name: String,
    pub description: String,
    pub included_addresses: Vec<String>,
    pub scan_template_id: String,
    pub schedules: Vec<Schedule>,
    pub alerts: Vec<AlertConfig>,
}
