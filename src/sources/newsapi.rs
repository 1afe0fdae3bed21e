//! NewsAPI top-headlines source.
//!
//! Issues one `GET` against the
//! [top-headlines](https://newsapi.org/docs/endpoints/top-headlines) endpoint
//! with a fixed page size and response language. Filters the user left unset
//! are omitted from the query instead of being sent empty.

use crate::config::AppConfig;
use crate::error::NewsError;
use crate::models::{Article, FilterSelection};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Language of the returned headlines.
pub const RESPONSE_LANGUAGE: &str = "en";

const UNKNOWN_ERROR: &str = "Unknown error";

/// The parts of a top-headlines body we read.
///
/// Success bodies carry `articles`; error bodies carry `status: "error"`,
/// a `code`, and a human-readable `message`.
#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Option<Vec<Article>>,
    message: Option<String>,
}

/// The result of one fetch: articles, or an empty list plus the reason.
#[derive(Debug)]
pub struct Headlines {
    pub articles: Vec<Article>,
    pub error: Option<NewsError>,
}

impl From<Result<Vec<Article>, NewsError>> for Headlines {
    fn from(result: Result<Vec<Article>, NewsError>) -> Self {
        match result {
            Ok(articles) => Self {
                articles,
                error: None,
            },
            Err(e) => Self {
                articles: Vec::new(),
                error: Some(e),
            },
        }
    }
}

impl Headlines {
    /// The message to show the user when the fetch failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(NewsError::user_message)
    }
}

/// Build the query string for a fetch.
///
/// Only filters that are present are included.
pub fn build_query(
    api_key: &str,
    page_size: u32,
    filters: &FilterSelection,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("apiKey", api_key.to_string()),
        ("language", RESPONSE_LANGUAGE.to_string()),
        ("pageSize", page_size.to_string()),
    ];
    if let Some(country) = &filters.country {
        params.push(("country", country.clone()));
    }
    if let Some(category) = filters.category {
        params.push(("category", category.code().to_string()));
    }
    if let Some(keyword) = &filters.keyword {
        params.push(("q", keyword.clone()));
    }
    params
}

/// Parse a top-headlines body.
///
/// A body without an `articles` list is an API error whose text is the
/// body's `message`, or `"Unknown error"` when there is none.
pub fn parse_headlines(body: &str) -> Result<Vec<Article>, NewsError> {
    let response: HeadlinesResponse = serde_json::from_str(body)?;
    match response.articles {
        Some(articles) => Ok(articles),
        None => Err(NewsError::Api(
            response.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        )),
    }
}

/// Client for the NewsAPI top-headlines endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(http: Client, config: &AppConfig, api_key: &str) -> Self {
        Self {
            http,
            endpoint: config.news_endpoint.clone(),
            api_key: api_key.to_string(),
            page_size: config.page_size,
        }
    }

    /// Fetch headlines, degrading any failure to an empty list.
    #[instrument(
        level = "info",
        skip_all,
        fields(country = ?filters.country, category = ?filters.category, keyword = ?filters.keyword)
    )]
    pub async fn fetch_headlines(&self, filters: &FilterSelection) -> Headlines {
        let headlines = Headlines::from(self.fetch(filters).await);
        match &headlines.error {
            None => info!(count = headlines.articles.len(), "Fetched headlines"),
            Some(e) => warn!(error = %e, "Headline fetch failed; continuing with no articles"),
        }
        headlines
    }

    // The key travels in the query string, so transport errors drop their URL
    // before they are logged or shown.
    async fn fetch(&self, filters: &FilterSelection) -> Result<Vec<Article>, NewsError> {
        let params = build_query(&self.api_key, self.page_size, filters);
        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| NewsError::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewsError::Http(e.without_url()))?;
        debug!(%status, body = %truncate_for_log(&body, 300), "NewsAPI response");
        parse_headlines(&body)
    }
}
