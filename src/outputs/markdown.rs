//! Markdown report output.
//!
//! One file per run, named after the date and edition:
//! `{markdown_output_dir}/{date}_{time_of_day}.md`. Only categories that
//! received at least one headline are written.

use crate::outputs::{category_video, Report};
use crate::utils::{slugify_title, upcase};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render a [`Report`] as Markdown.
///
/// # Structure
///
/// ```text
/// # Headlines: Morning edition, 2025-05-06
/// - [Technology](#technology) (2)
///
/// ## Technology
/// ### Chip fab opens
/// **Summary:** ...
/// ```
pub fn report_to_markdown(report: &Report<'_>) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Headlines: {} edition, {}\n\n",
        upcase(&report.time_of_day),
        report.local_date
    ));
    md.push_str(&format!(
        "*{} headlines from {}, category {}, summarized in {} at {}.*\n\n",
        report.groups.total(),
        report.filters.country_name(),
        report.filters.category_name(),
        report.filters.language,
        report.local_time
    ));
    if let Some(keyword) = &report.filters.keyword {
        md.push_str(&format!("*Keyword:* `{}`\n\n", keyword));
    }

    for (label, items) in report.groups.non_empty() {
        md.push_str(&format!(
            "- [{}](#{}) ({})\n",
            label,
            slugify_title(label.as_str()),
            items.len()
        ));
    }
    md.push('\n');

    for (label, items) in report.groups.non_empty() {
        md.push_str(&format!("## {}\n\n", label));
        for item in items {
            md.push_str(&format!("### {}\n\n", item.title));
            md.push_str(&format!("**Summary:** {}\n\n", item.summary));
            md.push_str(&format!("{}\n\n", item.description));
            if !item.url.is_empty() {
                md.push_str(&format!("[Read Full Article]({})\n\n", item.url));
            }
        }
        if let Some(video) = category_video(label) {
            md.push_str(&format!("Watch more about this category: <{}>\n\n", video));
        }
    }
    md
}

/// Path of the Markdown report: `{markdown_output_dir}/{date}_{time_of_day}.md`.
pub fn report_path(markdown_output_dir: &str, report: &Report<'_>) -> PathBuf {
    Path::new(markdown_output_dir).join(format!(
        "{}_{}.md",
        report.local_date, report.time_of_day
    ))
}

/// Write a [`Report`] as Markdown, returning the path written.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_report(
    report: &Report<'_>,
    markdown_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = report_path(markdown_output_dir, report);
    fs::create_dir_all(markdown_output_dir).await?;
    fs::write(&path, report_to_markdown(report)).await?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(path)
}
