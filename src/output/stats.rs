//! Console rendering of a diagnostic summary

use crate::output::diagnostics::DiagnosticSummary;
use std::fmt;

/// Human-readable report of a diagnostic summary
pub struct SummaryReport<'a>(pub &'a DiagnosticSummary);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "=== Run Diagnostics ===\n")?;

        let run = &summary.run_time;
        writeln!(f, "Run:")?;
        writeln!(f, "  Date: {}", run.date.as_deref().unwrap_or("-"))?;
        match run.duration {
            Some(duration) => writeln!(f, "  Duration: {:.1}s", duration)?,
            None => writeln!(f, "  Duration: -")?,
        }
        writeln!(f)?;

        let data = &summary.data_output;
        writeln!(f, "Artifacts:")?;
        write_artifact(f, "Word table", data.word_file.as_deref(), data.word_file_size_b)?;
        write_artifact(f, "Site table", data.site_file.as_deref(), data.site_file_size_b)?;
        write_artifact(f, "Log table", data.log_file.as_deref(), data.log_file_size_b)?;
        writeln!(f)?;

        let words = &summary.word_metrics;
        writeln!(f, "Words:")?;
        writeln!(f, "  Rows: {}", words.total_words)?;
        writeln!(f, "  Unique words: {}", words.unique_words)?;
        writeln!(f, "  Total occurrences: {}", words.sum_counts)?;
        writeln!(f)?;

        let sites = &summary.site_metrics;
        writeln!(f, "Page Structure:")?;
        writeln!(f, "  Images: {}", sites.sum_image_count)?;
        writeln!(f, "  Links: {}", sites.sum_link_count)?;
        writeln!(f, "  Forms: {}", sites.sum_form_count)?;
        writeln!(f, "  Stylesheets: {}", sites.sum_stylesheet_count)?;
        writeln!(f, "  Scripts: {}", sites.sum_script_count)?;
        writeln!(f)?;

        // Timeouts include robots.txt retries, so no fetch rate is derived
        let log = &summary.log_metrics;
        writeln!(f, "Run Log:")?;
        writeln!(f, "  URLs attempted: {}", log.urls_attempted)?;
        writeln!(f, "  Timeout events: {}", log.url_timeouts)?;
        writeln!(f, "  Disallowed skips: {}", log.disallowed_skip_count)?;
        writeln!(
            f,
            "  Levels: {} info, {} warning, {} error",
            log.level_info_count, log.level_warning_count, log.level_error_count
        )?;
        writeln!(
            f,
            "  Sources: {} robots, {} utility, {} scraper",
            log.robot_log_count, log.utility_log_count, log.scraper_log_count
        )
    }
}

/// Prints a diagnostic summary to stdout
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &DiagnosticSummary) {
    print!("{}", SummaryReport(summary));
}

fn write_artifact(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    path: Option<&str>,
    size: Option<u64>,
) -> fmt::Result {
    match (path, size) {
        (Some(path), Some(size)) => writeln!(f, "  {}: {} ({} bytes)", label, path, size),
        (Some(path), None) => writeln!(f, "  {}: {}", label, path),
        _ => writeln!(f, "  {}: (missing)", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::diagnostics::LogMetrics;

    #[test]
    fn test_robots_timeouts_do_not_read_as_fetch_failures() {
        let summary = DiagnosticSummary {
            log_metrics: LogMetrics {
                urls_attempted: 1,
                url_timeouts: 6,
                ..LogMetrics::default()
            },
            ..DiagnosticSummary::default()
        };

        let report = SummaryReport(&summary).to_string();

        assert!(report.contains("  URLs attempted: 1\n"));
        assert!(report.contains("  Timeout events: 6\n"));
        assert!(!report.contains("Success Rate"));
        assert!(!report.contains('%'));
    }

    #[test]
    fn test_missing_artifacts_reported() {
        let report = SummaryReport(&DiagnosticSummary::default()).to_string();
        assert!(report.contains("  Word table: (missing)\n"));
        assert!(report.contains("  Date: -\n"));
    }
}
