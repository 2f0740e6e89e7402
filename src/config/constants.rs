//! Configuration constants.
//!
//! This module defines the constants used throughout the application, including
//! REST API paths, request defaults and the CSV import layout.

/// Default console port.
pub const DEFAULT_PORT: u16 = 443;

/// Default per-request timeout in seconds. Site creation on a busy console
/// can take several seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent sent with every API request.
pub const USER_AGENT: &str = concat!("nexpose_bulk/", env!("CARGO_PKG_VERSION"));

// REST API (v3) paths, relative to `https://<host>:<port>/`
pub const API_INFO_PATH: &str = "api/3/administration/info";
pub const API_SITES_PATH: &str = "api/3/sites";
pub const API_SCAN_TEMPLATES_PATH: &str = "api/3/scan_templates";

/// Page size used when walking the site listing.
pub const SITE_PAGE_SIZE: u32 = 500;

/// Column names the import CSV must carry, in template order.
pub const CSV_COLUMNS: [&str; 7] = [
    "name",
    "description",
    "ip_address",
    "template_id",
    "schedule",
    "alerts_id",
    "date_time",
];

/// Header line printed by `--template`.
pub const CSV_TEMPLATE_HEADER: &str =
    "name,description,ip_address,template_id,schedule,alerts_id,date_time";

/// Separator line printed between sites when listing.
pub const LISTING_SEPARATOR: &str =
    "------------------------------------------------------------------------------";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_header_matches_columns() {
        assert_eq!(CSV_TEMPLATE_HEADER, CSV_COLUMNS.join(","));
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("nexpose_bulk/"));
        assert!(USER_AGENT.len() > "nexpose_bulk/".len());
    }
}
