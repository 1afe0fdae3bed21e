//! # Awful Headlines
//!
//! Fetches top headlines from NewsAPI, lists them, and on request asks an
//! OpenAI-compatible LLM to categorize and summarize each one.
//!
//! ## Features
//!
//! - Filters by country, news category, and keyword
//! - Categorizes every headline into Politics, Economy, Entertainment,
//!   Technology, Sports, or Other
//! - Summarizes every headline in two or three lines in the reader's language
//! - Falls back to a usable category and summary when the model is unreachable
//! - Optionally writes JSON and Markdown reports and MP3 audio summaries
//!
//! ## Usage
//!
//! ```sh
//! awful_headlines --country in --category technology --process -l Hindi
//! ```
//!
//! ## Architecture
//!
//! The application is a straight pipeline:
//! 1. **Fetching**: One request for up to 20 headlines
//! 2. **Listing**: Print what was fetched
//! 3. **Processing**: Classify then summarize each headline, one at a time,
//!    with a fixed pause between headlines
//! 4. **Output**: Print the grouped result and write the optional reports and audio

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod classify;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod speech;
mod summarize;
mod utils;

use api::ChatClient;
use cli::Cli;
use config::AppConfig;
use models::{speech_language_code, FilterSelection};
use outputs::{console, json, markdown, Report};
use pipeline::{Pipeline, PipelineOptions};
use sources::newsapi::NewsApiClient;
use speech::SpeechClient;
use utils::ensure_writable_dir;

/// Shared HTTP client; NewsAPI rejects requests without a user agent.
fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("awful_headlines starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.country, ?args.category, ?args.keyword, %args.language, process = args.process, "Parsed CLI arguments");

    let config = AppConfig::load(&args)?;
    info!(model = %config.model, page_size = config.page_size, "Configuration ready");

    // Fail on missing credentials before any request is made
    let news_api_key = config.require_news_api_key()?;
    let openai_api_key = if args.process {
        Some(config.require_openai_api_key()?)
    } else {
        None
    };
    if args.audio && !args.process {
        warn!("--audio has no effect without --process");
    }

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir]
        .into_iter()
        .flatten()
    {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable (fix perms or choose a different path)");
            return Err(e);
        }
    }

    let http = http_client()?;
    let filters = FilterSelection::new(
        args.country.clone(),
        args.category,
        args.keyword.clone(),
        args.language.clone(),
    );

    // ---- Fetch ----
    let headlines = NewsApiClient::new(http.clone(), &config, news_api_key)
        .fetch_headlines(&filters)
        .await;

    if let Some(message) = headlines.error_message() {
        print!("{}", console::render_fetch_error(&message));
    }
    if args.show_raw_json {
        println!("{}", serde_json::to_string_pretty(&headlines.articles)?);
    }
    print!("{}", console::render_listing(&headlines.articles, &filters));

    let openai_api_key = match openai_api_key {
        Some(key) if !headlines.articles.is_empty() => key,
        _ => {
            info!(elapsed_ms = start_time.elapsed().as_millis(), "Execution complete");
            return Ok(());
        }
    };

    // ---- Categorize & summarize ----
    let model = ChatClient::new(http.clone(), &config, openai_api_key);
    let pipeline = Pipeline::new(
        &model,
        PipelineOptions {
            delay: config.article_delay(),
            fold_unrecognized: config.fold_unrecognized_labels,
        },
    );
    let grouped = pipeline.process(&headlines.articles, &filters.language).await;
    print!("{}", console::render_grouped(&grouped));

    // ---- Reports ----
    let report = Report::new(&filters, &grouped);
    if let Some(dir) = &args.json_output_dir {
        match json::write_report(&report, dir).await {
            Ok(path) => println!("JSON report: {}", path.display()),
            Err(e) => error!(error = %e, "Failed to write JSON report"),
        }
    }
    if let Some(dir) = &args.markdown_output_dir {
        match markdown::write_report(&report, dir).await {
            Ok(path) => println!("Markdown report: {}", path.display()),
            Err(e) => error!(error = %e, "Failed to write Markdown report"),
        }
    }

    // ---- Audio ----
    if args.audio {
        let lang = speech_language_code(&filters.language);
        let files = SpeechClient::new(http, &config)
            .synthesize_all(&grouped, lang, &args.audio_dir)
            .await;
        for path in files {
            println!("Audio summary: {}", path.display());
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = grouped.total(),
        "Execution complete"
    );

    Ok(())
}
