//! Headline summarization.
//!
//! Asks the model for a two-to-three line summary in the reader's language.
//! On any error the summary degrades to the start of the description, see
//! [`fallback_summary`].

use crate::api::{AskAsync, Prompt};
use crate::models::Outcome;
use crate::utils::truncate_chars;
use tracing::{debug, instrument, warn};

/// Sampling temperature for summaries.
pub const SUMMARIZE_TEMPERATURE: f32 = 0.3;

/// Characters of the description kept by [`fallback_summary`].
pub const FALLBACK_SUMMARY_CHARS: usize = 150;

/// Build the summarization prompt.
pub fn summary_prompt(title: &str, description: &str, language: &str) -> String {
    format!(
        "Summarize this news in 2-3 lines in {language} for quick understanding:\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         \n\
         Summary:"
    )
}

/// The first 150 characters of the description followed by `...`.
pub fn fallback_summary(description: &str) -> String {
    format!("{}...", truncate_chars(description, FALLBACK_SUMMARY_CHARS))
}

/// Summarization client over any [`AskAsync`] model.
#[derive(Debug)]
pub struct Summarizer<'a, M> {
    model: &'a M,
}

impl<'a, M: AskAsync> Summarizer<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    #[instrument(level = "debug", skip_all, fields(%title, %language))]
    pub async fn summarize(&self, title: &str, description: &str, language: &str) -> Outcome<String> {
        let prompt = Prompt::new(
            summary_prompt(title, description, language),
            SUMMARIZE_TEMPERATURE,
        );
        match self.model.ask(&prompt).await {
            Ok(summary) => {
                debug!(chars = summary.chars().count(), "Summarized headline");
                Outcome::Answered(summary)
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed; using description excerpt");
                Outcome::Fallback(fallback_summary(description))
            }
        }
    }
}
