//! Command-line interface definitions for Awful Headlines.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can be provided via flags, environment variables, or the
//! YAML config file (see [`crate::config`]).

use crate::models::NewsCategory;
use clap::Parser;

/// Command-line arguments for the Awful Headlines application.
///
/// Without `--process` the tool only lists the fetched headlines. With it,
/// every headline is sent to the model for a category and a summary.
///
/// # Examples
///
/// ```sh
/// # Global top headlines
/// awful_headlines
///
/// # Indian technology headlines, categorized and summarized in Hindi
/// awful_headlines --country in --category technology -l Hindi --process
///
/// # Keyword search with reports and audio
/// awful_headlines -q "monsoon" -p --audio -j ./json -m ./markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Two-letter country code (omit for global headlines)
    #[arg(long, value_parser = parse_country_code)]
    pub country: Option<String>,

    /// News category (omit for all categories)
    #[arg(long, value_enum)]
    pub category: Option<NewsCategory>,

    /// Keyword to search for
    #[arg(short = 'q', long)]
    pub keyword: Option<String>,

    /// Language the summaries are written in
    #[arg(short, long, default_value = "English")]
    pub language: String,

    /// Categorize and summarize every headline with the model
    #[arg(short, long)]
    pub process: bool,

    /// Render each summary to an MP3 file (requires --process)
    #[arg(long)]
    pub audio: bool,

    /// Directory for the MP3 files
    #[arg(long, default_value = "./audio")]
    pub audio_dir: String,

    /// Print the fetched articles as JSON
    #[arg(long)]
    pub show_raw_json: bool,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// API key for the OpenAI-compatible model endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model identifier sent with every completion request
    #[arg(long)]
    pub model: Option<String>,

    /// Pause between articles while processing, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Group labels outside the six canonical categories under "Other"
    #[arg(long)]
    pub fold_unrecognized: bool,
}

/// Accept a two-letter ASCII country code, normalized to lowercase.
pub fn parse_country_code(s: &str) -> Result<String, String> {
    let code = s.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_lowercase())
    } else {
        Err(format!("expected a two-letter country code, got {:?}", s))
    }
}
