//! The categorize-and-summarize loop.
//!
//! Articles are processed one at a time, in fetch order: classify, summarize,
//! file under the returned label, then pause before the next article. The
//! pause is a fixed throttle and ignores how long the model calls took.

use crate::api::AskAsync;
use crate::classify::Classifier;
use crate::models::{Article, GroupedResult, ProcessedArticle};
use crate::summarize::Summarizer;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, instrument};

/// Options for one processing run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Pause between consecutive articles. Nothing waits after the last one.
    pub delay: Duration,
    /// File unrecognized labels under `Other` instead of their own group.
    pub fold_unrecognized: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            fold_unrecognized: false,
        }
    }
}

/// Runs classification and summarization over a list of articles.
#[derive(Debug)]
pub struct Pipeline<'a, M> {
    classifier: Classifier<'a, M>,
    summarizer: Summarizer<'a, M>,
    options: PipelineOptions,
}

impl<'a, M: AskAsync> Pipeline<'a, M> {
    pub fn new(model: &'a M, options: PipelineOptions) -> Self {
        Self {
            classifier: Classifier::new(model),
            summarizer: Summarizer::new(model),
            options,
        }
    }

    /// Classify and summarize every article, grouping the results by label.
    ///
    /// The six canonical groups are present even when empty. An empty input
    /// makes no model calls.
    #[instrument(level = "info", skip_all, fields(articles = articles.len(), %language))]
    pub async fn process(&self, articles: &[Article], language: &str) -> GroupedResult {
        let t0 = Instant::now();
        let mut grouped = GroupedResult::new();
        let mut label_fallbacks = 0usize;
        let mut summary_fallbacks = 0usize;

        for (i, article) in articles.iter().enumerate() {
            if i > 0 && !self.options.delay.is_zero() {
                sleep(self.options.delay).await;
            }

            let label = self
                .classifier
                .classify(&article.title, &article.description)
                .await;
            let summary = self
                .summarizer
                .summarize(&article.title, &article.description, language)
                .await;

            label_fallbacks += usize::from(label.is_fallback());
            summary_fallbacks += usize::from(summary.is_fallback());

            let mut label = label.into_value();
            if self.options.fold_unrecognized {
                label = label.folded();
            }
            info!(index = i, %label, title = %article.title, "Processed article");

            grouped.push(
                label,
                ProcessedArticle {
                    title: article.title.clone(),
                    summary: summary.into_value(),
                    description: article.description.clone(),
                    url: article.url.clone(),
                },
            );
        }

        info!(
            total = grouped.total(),
            groups = grouped.non_empty().count(),
            label_fallbacks,
            summary_fallbacks,
            elapsed_ms = t0.elapsed().as_millis(),
            "Completed article processing"
        );
        grouped
    }
}
