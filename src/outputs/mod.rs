//! Output generation for the console, JSON, and Markdown.
//!
//! # Submodules
//!
//! - [`console`]: Renders headline listings and grouped results for stdout
//! - [`json`]: Writes a [`Report`] to a JSON file
//! - [`markdown`]: Converts a [`Report`] to Markdown and writes it
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     └── evening.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_morning.md
//! └── 2025-05-06_evening.md
//! ```

use crate::models::{FilterSelection, GroupedResult, Label};
use crate::utils::time_of_day;
use chrono::Local;
use serde::Serialize;

pub mod console;
pub mod json;
pub mod markdown;

/// A video to watch for each canonical category.
pub fn category_video(label: &Label) -> Option<&'static str> {
    match label {
        Label::Politics => Some("https://www.youtube.com/embed/B56ixwzMuQs"),
        Label::Economy => Some("https://www.youtube.com/embed/78F_w4sk1x8"),
        Label::Entertainment => Some("https://www.youtube.com/embed/ZajzYJ9dOUM"),
        Label::Technology => Some("https://www.youtube.com/embed/wCgD7LqBIDM"),
        Label::Sports => Some("https://www.youtube.com/embed/JWqEKMnQG2g"),
        Label::Other => Some("https://www.youtube.com/embed/HtTUsOKjWyQ"),
        Label::Unrecognized(_) => None,
    }
}

/// Everything written to the report files for one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the run.
    pub local_time: String,
    /// "morning", "afternoon", or "evening".
    pub time_of_day: String,
    pub filters: &'a FilterSelection,
    pub groups: &'a GroupedResult,
}

impl<'a> Report<'a> {
    /// A report stamped with the current local time.
    pub fn new(filters: &'a FilterSelection, groups: &'a GroupedResult) -> Self {
        let now = Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            time_of_day: time_of_day(),
            filters,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_label_has_a_video() {
        for label in Label::CANONICAL.iter() {
            assert!(category_video(label).is_some());
        }
        assert!(category_video(&Label::Unrecognized("Health".to_string())).is_none());
    }

    #[test]
    fn test_report_serialization() {
        let filters = FilterSelection::new(Some("us".to_string()), None, None, "English");
        let groups = GroupedResult::new();
        let report = Report::new(&filters, &groups);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filters"]["country"], "us");
        assert!(json["filters"]["category"].is_null());
        assert!(json["groups"]["Politics"].as_array().unwrap().is_empty());
        assert_eq!(json["local_date"].as_str().unwrap().len(), 10);
    }
}
