//! JSON report output.
//!
//! Reports are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use crate::outputs::Report;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON report: `{json_output_dir}/{date}/{time_of_day}.json`.
pub fn report_path(json_output_dir: &str, report: &Report<'_>) -> PathBuf {
    Path::new(json_output_dir)
        .join(&report.local_date)
        .join(format!("{}.json", report.time_of_day))
}

/// Write a [`Report`] to a JSON file with date-based directory structure.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &Report<'_>,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(json_output_dir, report);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSelection, GroupedResult, Label, ProcessedArticle};

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let filters = FilterSelection::new(None, None, Some("rain".to_string()), "English");
        let mut groups = GroupedResult::new();
        groups.push(
            Label::Sports,
            ProcessedArticle {
                title: "Final tonight".to_string(),
                summary: "Teams meet.".to_string(),
                description: "The final is tonight.".to_string(),
                url: "https://example.com/final".to_string(),
            },
        );
        let report = Report::new(&filters, &groups);

        let path = write_report(&report, dir.path().to_str().unwrap()).await.unwrap();
        assert!(path.ends_with(format!("{}/{}.json", report.local_date, report.time_of_day)));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["filters"]["keyword"], "rain");
        assert_eq!(written["groups"]["Sports"][0]["title"], "Final tonight");
        assert_eq!(written["groups"]["Sports"][0]["url"], "https://example.com/final");
    }
}
