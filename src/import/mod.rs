//! Bulk site import from CSV.
//!
//! Each row of the CSV describes one site. Rows are processed in file order:
//! the row is parsed, the alerts of the referenced site are loaded, and the new
//! site is saved with those alerts. A failed row is recorded in the
//! [`ImportReport`]; whether the run carries on depends on the
//! [`ErrorPolicy`].

mod report;
mod row;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, info};

use crate::client::SiteApi;
use crate::config::{ErrorPolicy, CSV_COLUMNS};
use crate::context::RunContext;
use crate::error_handling::{ImportError, ParseError, RowError};
use crate::models::SiteId;

pub use report::{ImportReport, RowFailure};
pub use row::{parse_schedule_kind, parse_start_time, split_addresses, CsvRecord, ImportRow};

/// Creates one site per row of the CSV file at `path`.
///
/// Progress lines and the final summary are written to `out`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, its header lacks one of the
/// template columns, or `out` cannot be written. Failures of individual rows
/// are recorded in the returned [`ImportReport`] instead.
pub async fn import_sites<A: SiteApi, W: Write>(
    ctx: &RunContext<'_, A>,
    path: &Path,
    out: &mut W,
) -> Result<ImportReport> {
    writeln!(out, "Bulk Importing...")?;

    let read_error = |source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(read_error)?;
    let headers = reader.headers().map_err(read_error)?.clone();
    check_columns(&headers)?;
    let name_index = headers.iter().position(|h| h == "name");

    let mut report = ImportReport::default();
    for result in reader.records() {
        let (line, site_name, outcome) = match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                let site_name = name_index
                    .and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string();
                let outcome = match parse_row(line, &record, &headers) {
                    Ok(row) => {
                        writeln!(out, "Creating new site - {}", row.name)?;
                        create_site(ctx.api, row).await
                    }
                    Err(e) => Err(RowError::Parse(e)),
                };
                (line, site_name, outcome)
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                (line, String::new(), Err(RowError::Parse(ParseError::Csv(e))))
            }
        };

        match outcome {
            Ok(id) => {
                info!("Line {}: created site {} ('{}')", line, id, site_name);
                report.created.push((id, site_name));
            }
            Err(e) => {
                error!("Line {}: site '{}' not created: {}", line, site_name, e);
                report.failures.push(RowFailure {
                    line,
                    site_name,
                    error: e,
                });
                if ctx.error_policy == ErrorPolicy::Abort {
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    report.write_summary(out)?;
    Ok(report)
}

fn check_columns(headers: &StringRecord) -> Result<(), ImportError> {
    for column in CSV_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ImportError::MissingColumn(column));
        }
    }
    Ok(())
}

fn parse_row(line: u64, record: &StringRecord, headers: &StringRecord) -> Result<ImportRow, ParseError> {
    let raw: CsvRecord = record.deserialize(Some(headers))?;
    ImportRow::from_record(line, raw)
}

/// Loads the alerts to clone and saves the site described by `row`.
async fn create_site<A: SiteApi>(api: &A, row: ImportRow) -> Result<SiteId, RowError> {
    let clone_from = row.clone_alerts_from;
    let alerts = api
        .load_site(clone_from)
        .await
        .map_err(|source| RowError::CloneSource {
            site: clone_from,
            source,
        })?
        .alerts;

    let site = row.into_new_site(alerts);
    api.save_site(&site).await.map_err(RowError::Save)
}
