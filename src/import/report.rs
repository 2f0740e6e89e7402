//! Per-row outcomes of an import run.

use std::io::{self, Write};

use crate::error_handling::RowError;
use crate::models::SiteId;

/// A row that did not produce a site.
#[derive(Debug)]
pub struct RowFailure {
    /// Line of the row in the CSV file
    pub line: u64,
    /// Value of the row's `name` column (may be empty)
    pub site_name: String,
    pub error: RowError,
}

/// Summary of an import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Sites created, in file order
    pub created: Vec<(SiteId, String)>,
    /// Rows that failed, in file order
    pub failures: Vec<RowFailure>,
    /// Whether the run stopped at the first failure
    pub aborted: bool,
}

impl ImportReport {
    /// Rows processed (created plus failed).
    pub fn total(&self) -> usize {
        self.created.len() + self.failures.len()
    }

    pub fn succeeded(&self) -> usize {
        self.created.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Writes the end-of-run summary, one line per failed row.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Import finished: {} row{}, {} created, {} failed",
            self.total(),
            if self.total() == 1 { "" } else { "s" },
            self.succeeded(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(
                out,
                "   line {} ({}): {}",
                failure.line,
                if failure.site_name.is_empty() {
                    "unnamed"
                } else {
                    &failure.site_name
                },
                failure.error
            )?;
        }
        if self.aborted {
            writeln!(out, "Import aborted after the first failure; later rows were not processed")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ParseError;

    #[test]
    fn test_summary_counts_and_failure_lines() {
        let report = ImportReport {
            created: vec![(SiteId(31), "A".to_string()), (SiteId(32), "B".to_string())],
            failures: vec![RowFailure {
                line: 4,
                site_name: "C".to_string(),
                error: RowError::Parse(ParseError::UnknownSchedule("yearly".to_string())),
            }],
            aborted: false,
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert!(report.has_failures());

        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Import finished: 3 rows, 2 created, 1 failed")
        );
        let failure = lines.next().unwrap();
        assert!(failure.starts_with("   line 4 (C): unknown schedule 'yearly'"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_summary_of_aborted_run() {
        let report = ImportReport {
            created: Vec::new(),
            failures: vec![RowFailure {
                line: 2,
                site_name: String::new(),
                error: RowError::Parse(ParseError::InvalidDate("never".to_string())),
            }],
            aborted: true,
        };
        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Import finished: 1 row, 0 created, 1 failed\n"));
        assert!(text.contains("   line 2 (unnamed): cannot parse date_time 'never'"));
        assert!(text.ends_with("later rows were not processed\n"));
    }
}
