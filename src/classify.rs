//! Headline classification.
//!
//! Asks the model to pick one of the canonical labels for a headline. The
//! call is made at temperature 0 and never fails from the caller's point of
//! view: any error yields [`fallback_label`].

use crate::api::{AskAsync, Prompt};
use crate::error::ModelError;
use crate::models::{Label, Outcome};
use tracing::{debug, instrument, warn};

/// Sampling temperature for classification.
pub const CLASSIFY_TEMPERATURE: f32 = 0.0;

/// Build the classification prompt. Title and description are embedded verbatim.
pub fn classification_prompt(title: &str, description: &str) -> String {
    format!(
        "Categorize this news into [Politics, Economy, Entertainment, Technology, Sports, Other]:\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         \n\
         Category:"
    )
}

/// The label used whenever the model can't be asked.
pub fn fallback_label() -> Label {
    Label::Other
}

/// Classification client over any [`AskAsync`] model.
#[derive(Debug)]
pub struct Classifier<'a, M> {
    model: &'a M,
}

impl<'a, M: AskAsync> Classifier<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    #[instrument(level = "debug", skip_all, fields(%title))]
    pub async fn classify(&self, title: &str, description: &str) -> Outcome<Label> {
        let prompt = Prompt::new(classification_prompt(title, description), CLASSIFY_TEMPERATURE);
        let answer = self
            .model
            .ask(&prompt)
            .await
            .and_then(|text| Label::parse(&text).ok_or(ModelError::EmptyCompletion));
        match answer {
            Ok(label) => {
                debug!(%label, canonical = label.is_canonical(), "Classified headline");
                Outcome::Answered(label)
            }
            Err(e) => {
                warn!(error = %e, "Classification failed; using fallback label");
                Outcome::Fallback(fallback_label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{local_http, serve_once, unavailable, ScriptedModel};
    use crate::api::ChatClient;
    use crate::config::AppConfig;

    #[test]
    fn test_prompt_embeds_title_and_description() {
        let prompt = classification_prompt("Chip exports rise", "Semiconductor sales grew.");
        assert!(prompt.starts_with(
            "Categorize this news into [Politics, Economy, Entertainment, Technology, Sports, Other]:"
        ));
        assert!(prompt.contains("Title: Chip exports rise\n"));
        assert!(prompt.contains("Description: Semiconductor sales grew.\n"));
        assert!(prompt.ends_with("Category:"));
    }

    #[tokio::test]
    async fn test_classify_parses_answer_at_zero_temperature() {
        let model = ScriptedModel::new(|_: &Prompt| Ok(" Technology\n".to_string()));
        let outcome = Classifier::new(&model).classify("t", "d").await;
        assert_eq!(outcome, Outcome::Answered(Label::Technology));
        assert_eq!(model.calls(), 1);
        assert_eq!(model.prompts()[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn test_classify_keeps_unrecognized_label() {
        let model = ScriptedModel::new(|_: &Prompt| Ok("Health".to_string()));
        let outcome = Classifier::new(&model).classify("t", "d").await;
        assert_eq!(
            outcome,
            Outcome::Answered(Label::Unrecognized("Health".to_string()))
        );
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_any_error() {
        let model = unavailable();
        let outcome = Classifier::new(&model).classify("t", "d").await;
        assert_eq!(outcome, Outcome::Fallback(Label::Other));

        let rate_limited = ScriptedModel::new(|_: &Prompt| {
            Err(ModelError::Status {
                status: 429,
                body: "slow down".to_string(),
            })
        });
        let outcome = Classifier::new(&rate_limited).classify("t", "d").await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value(), fallback_label());
    }

    #[tokio::test]
    async fn test_classify_treats_punctuation_only_reply_as_failure() {
        for reply in ["...", "**", "\"\""] {
            let model = ScriptedModel::new(move |_: &Prompt| Ok(reply.to_string()));
            let outcome = Classifier::new(&model).classify("t", "d").await;
            assert_eq!(outcome, Outcome::Fallback(Label::Other), "reply {reply:?}");
        }
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_server_error() {
        let (base, request) = serve_once("500 Internal Server Error", "upstream exploded").await;
        let mut config = AppConfig::default();
        config.api_base = format!("{base}/v1");
        let client = ChatClient::new(local_http(), &config, "sk-test");

        let outcome = Classifier::new(&client).classify("Chip exports rise", "d").await;
        assert_eq!(outcome, Outcome::Fallback(Label::Other));

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request.contains("Chip exports rise"));
    }
}
