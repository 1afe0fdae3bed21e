//! Data models for headlines and their categorized representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FilterSelection`]: What the user asked the news API for
//! - [`Article`]: A headline as returned by the news API
//! - [`Label`]: The category assigned to a headline by the model
//! - [`Outcome`]: A model answer, or the fallback that replaced it
//! - [`GroupedResult`]: Processed headlines grouped by label
//!
//! The lookup tables for countries and summary languages live here too, since
//! both the CLI and the renderers need them.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when the API omits an article title.
pub const NO_TITLE: &str = "No Title";
/// Placeholder used when the API omits an article description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Countries with a display name. Any other 2-letter code is still accepted.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("in", "India"),
    ("us", "United States"),
    ("gb", "United Kingdom"),
    ("au", "Australia"),
    ("ca", "Canada"),
    ("de", "Germany"),
    ("fr", "France"),
    ("jp", "Japan"),
    ("cn", "China"),
    ("br", "Brazil"),
    ("za", "South Africa"),
];

/// Summary languages and their 2-letter codes for speech synthesis.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Hindi", "hi"),
    ("Bengali", "bn"),
    ("Gujarati", "gu"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
    ("Kannada", "kn"),
    ("Malayalam", "ml"),
    ("Marathi", "mr"),
    ("Punjabi", "pa"),
];

/// Display name for a country code; `None` means global headlines.
pub fn country_name(code: Option<&str>) -> String {
    match code {
        None => "Global".to_string(),
        Some(code) => COUNTRIES
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| code.to_ascii_uppercase()),
    }
}

/// Speech language code for a summary language name, `"en"` when unknown.
pub fn speech_language_code(language: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language.trim()))
        .map(|(_, code)| *code)
        .unwrap_or("en")
}

/// The categories the news search endpoint can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    /// The value sent as the `category` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::General => "general",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NewsCategory::Business => "Business",
            NewsCategory::Entertainment => "Entertainment",
            NewsCategory::General => "General",
            NewsCategory::Health => "Health",
            NewsCategory::Science => "Science",
            NewsCategory::Sports => "Sports",
            NewsCategory::Technology => "Technology",
        }
    }
}

/// The user's filters for one fetch.
///
/// Absent values are `None` and are never sent to the API. Use
/// [`FilterSelection::new`] so that blank keywords and mixed-case country
/// codes are normalized the same way everywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    /// Lowercase 2-letter country code; `None` means global.
    pub country: Option<String>,
    /// `None` means all categories.
    pub category: Option<NewsCategory>,
    /// Free-text search term.
    pub keyword: Option<String>,
    /// Human language name the summaries are written in.
    pub language: String,
}

impl FilterSelection {
    pub fn new(
        country: Option<String>,
        category: Option<NewsCategory>,
        keyword: Option<String>,
        language: impl Into<String>,
    ) -> Self {
        let country = country
            .map(|c| c.trim().to_ascii_lowercase())
            .filter(|c| !c.is_empty());
        let keyword = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            country,
            category,
            keyword,
            language: language.into(),
        }
    }

    pub fn country_name(&self) -> String {
        country_name(self.country.as_deref())
    }

    pub fn category_name(&self) -> &'static str {
        self.category.map(|c| c.display_name()).unwrap_or("All")
    }
}

/// The wire shape of an article; every field may be missing or null.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

/// A headline as returned by the news search endpoint.
///
/// Missing titles and descriptions are replaced with placeholders at
/// deserialization time; the record is never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawArticle")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub image_url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| NO_TITLE.to_string()),
            description: raw.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: raw.url.unwrap_or_default(),
            image_url: raw.url_to_image.unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
        }
    }
}

/// The category assigned to a headline.
///
/// The six canonical labels are the ones the classification prompt offers.
/// The model may still answer with anything, which lands in
/// [`Label::Unrecognized`] so grouping stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Politics,
    Economy,
    Entertainment,
    Technology,
    Sports,
    Other,
    Unrecognized(String),
}

impl Label {
    /// The canonical labels, in display order.
    pub const CANONICAL: [Label; 6] = [
        Label::Politics,
        Label::Economy,
        Label::Entertainment,
        Label::Technology,
        Label::Sports,
        Label::Other,
    ];

    /// Parse a model completion into a label.
    ///
    /// Surrounding whitespace, quotes, markdown emphasis and a trailing period
    /// are ignored and canonical names match case-insensitively, so
    /// `" technology."` is [`Label::Technology`]. Returns `None` when nothing
    /// is left after cleaning.
    pub fn parse(text: &str) -> Option<Label> {
        let cleaned = text
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '*' | '`'))
            .trim_end_matches('.')
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '*' | '`'));
        if cleaned.is_empty() {
            return None;
        }
        let label = Self::CANONICAL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(cleaned))
            .unwrap_or_else(|| Label::Unrecognized(cleaned.to_string()));
        Some(label)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Label::Politics => "Politics",
            Label::Economy => "Economy",
            Label::Entertainment => "Entertainment",
            Label::Technology => "Technology",
            Label::Sports => "Sports",
            Label::Other => "Other",
            Label::Unrecognized(s) => s,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Label::Unrecognized(_))
    }

    /// Map unrecognized labels onto [`Label::Other`].
    pub fn folded(self) -> Label {
        match self {
            Label::Unrecognized(_) => Label::Other,
            label => label,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A model answer, or the fallback substituted because the call failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Answered(T),
    Fallback(T),
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    #[cfg(test)]
    pub fn value(&self) -> &T {
        match self {
            Outcome::Answered(v) | Outcome::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Answered(v) | Outcome::Fallback(v) => v,
        }
    }
}

/// One headline after classification and summarization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedArticle {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub url: String,
}

/// Processed headlines grouped by label.
///
/// The six canonical groups always exist, first and in canonical order.
/// Other labels get a group the first time they are seen.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult {
    groups: Vec<(Label, Vec<ProcessedArticle>)>,
}

impl Default for GroupedResult {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupedResult {
    pub fn new() -> Self {
        Self {
            groups: Label::CANONICAL
                .into_iter()
                .map(|label| (label, Vec::new()))
                .collect(),
        }
    }

    pub fn push(&mut self, label: Label, article: ProcessedArticle) {
        match self.groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, items)) => items.push(article),
            None => self.groups.push((label, vec![article])),
        }
    }

    #[cfg(test)]
    pub fn get(&self, label: &Label) -> Option<&[ProcessedArticle]> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, items)| items.as_slice())
    }

    /// All groups, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &[ProcessedArticle])> {
        self.groups.iter().map(|(l, items)| (l, items.as_slice()))
    }

    pub fn non_empty(&self) -> impl Iterator<Item = (&Label, &[ProcessedArticle])> {
        self.iter().filter(|(_, items)| !items.is_empty())
    }

    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.groups.iter().map(|(l, _)| l)
    }

    /// Total number of processed articles across all groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }
}

impl Serialize for GroupedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (label, items) in &self.groups {
            map.serialize_entry(label.as_str(), items)?;
        }
        map.end()
    }
}
