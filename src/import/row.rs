//! Parsing of one import CSV row into a typed site definition.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error_handling::ParseError;
use crate::models::{AlertConfig, NewSite, Schedule, ScheduleKind, SiteId};

/// A row exactly as it appears in the CSV, keyed by header name.
#[derive(Debug, Deserialize)]
pub struct CsvRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ip_address: String,
    pub template_id: String,
    pub schedule: String,
    pub alerts_id: String,
    pub date_time: String,
}

/// A validated import row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Line of the row in the CSV file
    pub line: u64,
    pub name: String,
    pub description: String,
    pub addresses: Vec<String>,
    pub template_id: String,
    pub schedule: Schedule,
    /// Site whose alerts are copied onto the new site
    pub clone_alerts_from: SiteId,
}

impl ImportRow {
    /// Validates `record`, read from CSV line `line`.
    ///
    /// # Errors
    ///
    /// - `ParseError::UnknownSchedule` if `schedule` is not one of the five keywords
    /// - `ParseError::InvalidDate` if `date_time` cannot be parsed
    /// - `ParseError::InvalidSiteId` if `alerts_id` is not a numeric site id
    pub fn from_record(line: u64, record: CsvRecord) -> Result<Self, ParseError> {
        let kind = parse_schedule_kind(&record.schedule)?;
        let start = parse_start_time(&record.date_time)?;
        let clone_alerts_from =
            record
                .alerts_id
                .parse::<SiteId>()
                .map_err(|_| ParseError::InvalidSiteId {
                    column: "alerts_id",
                    value: record.alerts_id.clone(),
                })?;

        Ok(Self {
            line,
            addresses: split_addresses(&record.ip_address),
            name: record.name,
            description: record.description,
            template_id: record.template_id,
            schedule: Schedule::every(kind, start),
            clone_alerts_from,
        })
    }

    /// Builds the site to create, carrying `alerts` copied from the clone source.
    pub fn into_new_site(self, alerts: Vec<AlertConfig>) -> NewSite {
        NewSite {
            name: self.name,
            description: self.description,
            included_addresses: self.addresses,
            scan_template_id: self.template_id,
            schedules: vec![self.schedule],
            alerts,
        }
    }
}

/// Splits the `ip_address` column on commas. Elements are trimmed and empty
/// elements dropped; each remaining one is an address, range or host name.
pub fn split_addresses(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps the `schedule` column to a schedule kind by exact keyword match.
pub fn parse_schedule_kind(value: &str) -> Result<ScheduleKind, ParseError> {
    value
        .parse::<ScheduleKind>()
        .map_err(|_| ParseError::UnknownSchedule(value.to_string()))
}

/// Parses the `date_time` column and normalizes it to UTC.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2026-03-01T02:00:00Z`, `2026-03-01T02:00:00+01:00`)
/// - `YYYY-MM-DD HH:MM[:SS] ±hhmm` or `... UTC`
/// - `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]`, `YYYY/MM/DD HH:MM[:SS]`
///   and `Mon D YYYY HH:MM[:SS]` in local time
/// - `YYYY-MM-DD`, `YYYY/MM/DD` or `Mon D YYYY`, at local midnight
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let value = value.trim();
    let invalid = || ParseError::InvalidDate(value.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M %z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S UTC", "%Y-%m-%d %H:%M UTC"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%b %d %Y %H:%M:%S",
        "%b %d %Y %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return local_to_utc(&naive).ok_or_else(invalid);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%b %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
            return local_to_utc(&midnight).ok_or_else(invalid);
        }
    }

    Err(invalid())
}

/// Interprets `naive` in the local time zone. Ambiguous times (DST fall-back)
/// take the earlier instant; times skipped by DST do not exist.
fn local_to_utc(naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
