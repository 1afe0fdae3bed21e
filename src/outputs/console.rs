//! Console rendering.
//!
//! Everything the user reads goes to stdout through these functions; logs go
//! to stderr. The renderers return `String`s so they can be tested.

use crate::models::{Article, FilterSelection, GroupedResult};
use crate::outputs::category_video;

/// Message shown when a fetch degraded to no results.
pub fn render_fetch_error(message: &str) -> String {
    format!("NewsAPI Error: {}\n", message)
}

/// The list of fetched headlines, or a hint when there are none.
pub fn render_listing(articles: &[Article], filters: &FilterSelection) -> String {
    if articles.is_empty() {
        return "No news found. Try changing filters or keywords.\n".to_string();
    }

    let mut out = format!(
        "Showing {} latest articles from {}, Category: {}\n\n",
        articles.len(),
        filters.country_name(),
        filters.category_name()
    );
    for (i, article) in articles.iter().enumerate() {
        out.push_str(&format!("{:>2}. {}\n", i + 1, article.title));
        if !article.published_at.is_empty() {
            out.push_str(&format!("    Published: {}\n", article.published_at));
        }
        out.push_str(&format!("    {}\n", article.description));
        if !article.image_url.is_empty() {
            out.push_str(&format!("    Image: {}\n", article.image_url));
        }
        if !article.url.is_empty() {
            out.push_str(&format!("    Read Full Article: {}\n", article.url));
        }
        out.push('\n');
    }
    out
}

/// The categorized headlines; empty categories are skipped.
pub fn render_grouped(grouped: &GroupedResult) -> String {
    let mut out = String::from("AI-Powered Categorized News\n\n");
    for (label, items) in grouped.non_empty() {
        out.push_str(&format!("== {} News ({}) ==\n\n", label, items.len()));
        for item in items {
            out.push_str(&format!("* {}\n", item.title));
            out.push_str(&format!("  Summary: {}\n", item.summary.replace('\n', "\n           ")));
            if !item.url.is_empty() {
                out.push_str(&format!("  Read Full Article: {}\n", item.url));
            }
            out.push_str(&format!("  {}\n\n", item.description));
        }
        if let Some(video) = category_video(label) {
            out.push_str(&format!("Watch more about this category: {}\n\n", video));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Label, NewsCategory, ProcessedArticle};

    fn article(title: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            description: "Desc".to_string(),
            url: url.to_string(),
            image_url: String::new(),
            published_at: "2025-05-06T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_empty_listing_warns() {
        let filters = FilterSelection::new(None, None, None, "English");
        assert!(render_listing(&[], &filters).starts_with("No news found."));
    }

    #[test]
    fn test_listing_banner_and_links() {
        let filters = FilterSelection::new(
            Some("gb".to_string()),
            Some(NewsCategory::Health),
            None,
            "English",
        );
        let out = render_listing(&[article("A", "https://a"), article("B", "")], &filters);
        assert!(out.starts_with("Showing 2 latest articles from United Kingdom, Category: Health"));
        assert!(out.contains(" 1. A\n"));
        assert!(out.contains("Published: 2025-05-06T10:00:00Z"));
        assert_eq!(out.matches("Read Full Article").count(), 1);
        assert!(!out.contains("Image:"));
    }

    #[test]
    fn test_fetch_error() {
        assert_eq!(render_fetch_error("Unknown error"), "NewsAPI Error: Unknown error\n");
    }

    #[test]
    fn test_grouped_skips_empty_categories() {
        let mut grouped = GroupedResult::new();
        grouped.push(
            Label::Economy,
            ProcessedArticle {
                title: "Rates".to_string(),
                summary: "Held.\nAgain.".to_string(),
                description: "Bank held rates.".to_string(),
                url: String::new(),
            },
        );
        let out = render_grouped(&grouped);
        assert!(out.contains("== Economy News (1) =="));
        assert!(!out.contains("Politics"));
        assert!(out.contains("Summary: Held.\n           Again."));
        assert!(out.contains("78F_w4sk1x8"));
    }
}
