/*!
 * Run accounting and reporting
 *
 * The plain summary block keeps fixed labels and column widths so
 * downstream tooling can grep it; the table format is for people.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};
use tracing::info;

use crate::types::DuplicateStatus;
use crate::utils::format_file_size;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files classified `NONE` and posted
    pub new_files_posted: usize,
    /// Files classified `DUPLICATE`
    pub duplicate_files_found: usize,
    /// Files classified `DUPLICATE_CONTENTS`
    pub duplicate_contents_found: usize,
    /// Files classified `PREVIOUSLY_SCANNED`
    pub previously_scanned_files: usize,
    /// Per-file I/O or network failures
    pub failed_operations: usize,
    /// Deletion directives that produced a new marker
    pub markers_created: usize,
    /// Markers removed after confirmation
    pub markers_removed: usize,
    /// Directories held back by a declined marker
    pub directories_skipped: usize,
    /// Bytes read while fingerprinting
    pub bytes_hashed: u64,
}

impl RunSummary {
    /// Count one classified file under its status
    pub fn record(&mut self, status: DuplicateStatus) {
        match status {
            DuplicateStatus::None => self.new_files_posted += 1,
            DuplicateStatus::Duplicate => self.duplicate_files_found += 1,
            DuplicateStatus::DuplicateContents => self.duplicate_contents_found += 1,
            DuplicateStatus::PreviouslyScanned => self.previously_scanned_files += 1,
            // Tracked through markers_created instead
            DuplicateStatus::MarkedForDeletion => {}
        }
    }

    /// Count one failed operation
    pub fn record_failure(&mut self) {
        self.failed_operations += 1;
    }

    /// Whether the run finished without failed operations
    pub fn is_clean(&self) -> bool {
        self.failed_operations == 0
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub duration: Duration,
    pub dry_run: bool,
}

impl RunReport {
    /// Report for a run that could not start; the abort counts as one failure
    pub fn aborted(dry_run: bool) -> Self {
        let mut summary = RunSummary::default();
        summary.record_failure();
        Self {
            summary,
            duration: Duration::ZERO,
            dry_run,
        }
    }
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Fixed-width labeled counts only
    #[default]
    Plain,
    /// Fixed block plus a console table
    Table,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// The fixed five-line block, one label per line
    pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
        [
            ("Duplicate Contents Found:", summary.duplicate_contents_found),
            ("Duplicate Files Found:", summary.duplicate_files_found),
            ("Previously Scanned Files:", summary.previously_scanned_files),
            ("New Files Posted:", summary.new_files_posted),
            ("Failed Operations:", summary.failed_operations),
        ]
        .iter()
        .map(|(label, count)| format!("{:<28}{}", label, count))
        .collect()
    }

    /// Marker bookkeeping kept apart from the fixed block
    pub fn marker_line(summary: &RunSummary) -> String {
        format!(
            "Deletion markers created: {}, removed: {}, directories skipped: {}",
            summary.markers_created, summary.markers_removed, summary.directories_skipped
        )
    }

    /// Generate the report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        let mut out = Self::summary_lines(&report.summary).join("\n");
        out.push('\n');
        out.push_str(&Self::marker_line(&report.summary));

        match self.format {
            ReportFormat::Plain => out,
            ReportFormat::Table => format!("{}\n\n{}", out, self.create_summary_table(report)),
        }
    }

    /// Emit the report through the log, one line per entry
    pub fn log_report(&self, report: &RunReport) {
        for line in self.generate_report(report).lines() {
            info!("{}", line);
        }
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let s = &report.summary;
        let rows = vec![
            SummaryRow {
                key: "Mode",
                value: if report.dry_run { "dry run" } else { "live" }.to_string(),
            },
            SummaryRow {
                key: "Run Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "New Files Posted",
                value: s.new_files_posted.to_string(),
            },
            SummaryRow {
                key: "Duplicate Files",
                value: s.duplicate_files_found.to_string(),
            },
            SummaryRow {
                key: "Duplicate Contents",
                value: s.duplicate_contents_found.to_string(),
            },
            SummaryRow {
                key: "Previously Scanned",
                value: s.previously_scanned_files.to_string(),
            },
            SummaryRow {
                key: "Failed Operations",
                value: s.failed_operations.to_string(),
            },
            SummaryRow {
                key: "Markers Created",
                value: s.markers_created.to_string(),
            },
            SummaryRow {
                key: "Markers Removed",
                value: s.markers_removed.to_string(),
            },
            SummaryRow {
                key: "Directories Skipped",
                value: s.directories_skipped.to_string(),
            },
            SummaryRow {
                key: "Data Hashed",
                value: format_file_size(s.bytes_hashed),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }
}
