//! JSON resources of the console REST API (v3) and their conversion to and
//! from the domain model.

use chrono::{Datelike, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::models::{
    AlertConfig, AlertVariant, NewSite, Schedule, ScheduleKind, ScanEvent, SiteId, SiteRef,
    VulnEvent,
};

/// A paged (or unpaged) collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct Resources<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
    #[serde(default)]
    pub page: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteResource {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scan_template: Option<String>,
}

impl From<SiteResource> for SiteRef {
    fn from(site: SiteResource) -> Self {
        SiteRef {
            id: SiteId(site.id),
            name: site.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScanTemplateResource {
    pub name: String,
}

/// Body returned when a resource is created.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedReference {
    pub id: u64,
}

/// Error body returned by the console alongside a failure status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScanEventsResource {
    #[serde(default)]
    pub start: bool,
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub resumed: bool,
    #[serde(default)]
    pub paused: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VulnEventsResource {
    #[serde(default)]
    pub confirmed_vulnerabilities: bool,
    #[serde(default)]
    pub unconfirmed_vulnerabilities: bool,
    #[serde(default)]
    pub potential_vulnerabilities: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_severity: Option<String>,
}

/// An alert as read from `GET /api/3/sites/{id}/alerts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AlertResource {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub maximum_alerts: Option<u32>,
    pub notification: String,
    #[serde(default)]
    pub enabled_scan_events: ScanEventsResource,
    #[serde(default)]
    pub enabled_vulnerability_events: VulnEventsResource,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub relay_server: Option<String>,
    #[serde(default)]
    pub sender_email_address: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
}

impl From<AlertResource> for AlertConfig {
    fn from(alert: AlertResource) -> Self {
        let scan = &alert.enabled_scan_events;
        let scan_filter = [
            (ScanEvent::Start, scan.start),
            (ScanEvent::Stop, scan.stopped),
            (ScanEvent::Fail, scan.failed),
            (ScanEvent::Resume, scan.resumed),
            (ScanEvent::Pause, scan.paused),
        ]
        .into_iter()
        .filter_map(|(event, on)| on.then_some(event))
        .collect();

        let vuln = &alert.enabled_vulnerability_events;
        let vuln_filter = [
            (VulnEvent::Severity, vuln.vulnerability_severity.is_some()),
            (VulnEvent::Confirmed, vuln.confirmed_vulnerabilities),
            (VulnEvent::Unconfirmed, vuln.unconfirmed_vulnerabilities),
            (VulnEvent::Potential, vuln.potential_vulnerabilities),
        ]
        .into_iter()
        .filter_map(|(event, on)| on.then_some(event))
        .collect();

        let server = alert.server.clone().unwrap_or_default();
        let variant = match alert.notification.to_ascii_lowercase().as_str() {
            "smtp" => AlertVariant::Smtp {
                sender: alert.sender_email_address.clone().unwrap_or_default(),
                server: alert.relay_server.clone().unwrap_or(server),
                recipients: alert.recipients.clone(),
            },
            "snmp" => AlertVariant::Snmp {
                community: alert.community.clone().unwrap_or_default(),
                server,
            },
            "syslog" => AlertVariant::Syslog { server },
            _ => AlertVariant::Other {
                kind: alert.notification.clone(),
            },
        };

        AlertConfig {
            name: alert.name,
            enabled: alert.enabled,
            max_alerts: alert.maximum_alerts.unwrap_or(0),
            scan_filter,
            vuln_filter,
            severity_threshold: alert.enabled_vulnerability_events.vulnerability_severity,
            variant,
        }
    }
}

/// Body of `POST /api/3/sites/{id}/alerts/{smtp|snmp|syslog}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AlertBody {
    pub name: String,
    pub enabled: bool,
    pub maximum_alerts: u32,
    pub notification: &'static str,
    pub enabled_scan_events: ScanEventsResource,
    pub enabled_vulnerability_events: VulnEventsResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl AlertBody {
    /// Builds the creation body for `alert` together with the path segment of
    /// its notification type. Returns `None` for alerts of an unknown type.
    pub fn from_alert(alert: &AlertConfig) -> Option<(&'static str, AlertBody)> {
        let mut body = AlertBody {
            name: alert.name.clone(),
            enabled: alert.enabled,
            maximum_alerts: alert.max_alerts,
            notification: "",
            enabled_scan_events: ScanEventsResource {
                start: alert.scan_filter.contains(ScanEvent::Start),
                stopped: alert.scan_filter.contains(ScanEvent::Stop),
                failed: alert.scan_filter.contains(ScanEvent::Fail),
                resumed: alert.scan_filter.contains(ScanEvent::Resume),
                paused: alert.scan_filter.contains(ScanEvent::Pause),
            },
            enabled_vulnerability_events: VulnEventsResource {
                confirmed_vulnerabilities: alert.vuln_filter.contains(VulnEvent::Confirmed),
                unconfirmed_vulnerabilities: alert.vuln_filter.contains(VulnEvent::Unconfirmed),
                potential_vulnerabilities: alert.vuln_filter.contains(VulnEvent::Potential),
                vulnerability_severity: alert
                    .vuln_filter
                    .contains(VulnEvent::Severity)
                    .then(|| {
                        alert
                            .severity_threshold
                            .clone()
                            .unwrap_or_else(|| "any_severity".to_string())
                    }),
            },
            sender_email_address: None,
            relay_server: None,
            recipients: None,
            community: None,
            server: None,
        };

        let segment = match &alert.variant {
            AlertVariant::Smtp {
                sender,
                server,
                recipients,
            } => {
                body.notification = "SMTP";
                body.sender_email_address = Some(sender.clone());
                body.relay_server = Some(server.clone());
                body.recipients = Some(recipients.clone());
                "smtp"
            }
            AlertVariant::Snmp { community, server } => {
                body.notification = "SNMP";
                body.community = Some(community.clone());
                body.server = Some(server.clone());
                "snmp"
            }
            AlertVariant::Syslog { server } => {
                body.notification = "Syslog";
                body.server = Some(server.clone());
                "syslog"
            }
            AlertVariant::Other { .. } => return None,
        };
        Some((segment, body))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IncludedTargets {
    addresses: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteAssets {
    included_targets: IncludedTargets,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteScan {
    assets: SiteAssets,
}

/// Body of `POST /api/3/sites`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteCreateBody {
    name: String,
    description: String,
    scan_template_id: String,
    scan: SiteScan,
}

impl From<&NewSite> for SiteCreateBody {
    fn from(site: &NewSite) -> Self {
        SiteCreateBody {
            name: site.name.clone(),
            description: site.description.clone(),
            scan_template_id: site.scan_template_id.clone(),
            scan: SiteScan {
                assets: SiteAssets {
                    included_targets: IncludedTargets {
                        addresses: site.included_addresses.clone(),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepeatBody {
    every: &'static str,
    interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_of_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    week_of_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_week: Option<String>,
}

/// Body of `POST /api/3/sites/{id}/scan_schedules`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScheduleBody {
    enabled: bool,
    on_scan_repeat: &'static str,
    start: String,
    repeat: RepeatBody,
}

impl From<&Schedule> for ScheduleBody {
    fn from(schedule: &Schedule) -> Self {
        let start = schedule.start;
        let mut repeat = RepeatBody {
            every: "",
            interval: schedule.interval,
            date_of_month: None,
            week_of_month: None,
            day_of_week: None,
        };
        repeat.every = match schedule.kind {
            ScheduleKind::Hourly => "hour",
            ScheduleKind::Daily => "day",
            ScheduleKind::Weekly => "week",
            ScheduleKind::MonthlyDate => {
                repeat.date_of_month = Some(start.day());
                "date-of-month"
            }
            ScheduleKind::MonthlyDay => {
                repeat.week_of_month = Some((start.day() - 1) / 7 + 1);
                repeat.day_of_week = Some(weekday_name(start.weekday()).to_string());
                "day-of-month"
            }
        };

        ScheduleBody {
            enabled: true,
            on_scan_repeat: "restart-scan",
            start: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            repeat,
        }
    }
}

fn weekday_name(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Mon => "monday",
        chrono::Weekday::Tue => "tuesday",
        chrono::Weekday::Wed => "wednesday",
        chrono::Weekday::Thu => "thursday",
        chrono::Weekday::Fri => "friday",
        chrono::Weekday::Sat => "saturday",
        chrono::Weekday::Sun => "sunday",
    }
}
