use tracing::info;

use crate::{
    error::SuggestResult,
    gemini::{GenerationReply, TextGenerator},
    prompt::build_prompt,
    samples::Sample,
    weights::{parse_weights, strip_fences, WeightTriple},
};

/// Everything one suggestion round produced, in the order it was produced.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub prompt: String,
    pub reply: GenerationReply,
    pub cleaned: String,
    pub weights: WeightTriple,
}

pub struct WeightSuggester<G> {
    generator: G,
}

impl<G: TextGenerator> WeightSuggester<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Sends one prompt built from `samples` and parses the reply. Never retries.
    pub async fn suggest(&self, samples: &[Sample]) -> SuggestResult<Suggestion> {
        let prompt = build_prompt(samples)?;
        info!(samples = samples.len(), "requesting weight suggestion");
        let reply = self.generator.generate(&prompt).await?;
        let cleaned = strip_fences(&reply.text);
        let weights = parse_weights(&cleaned)?;
        info!(w1 = weights.w1, w2 = weights.w2, w3 = weights.w3, "weights parsed");
        Ok(Suggestion {
            prompt,
            reply,
            cleaned,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::SuggestError;

    struct CannedGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> SuggestResult<GenerationReply> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(GenerationReply {
                    raw_body: String::new(),
                    text: text.clone(),
                }),
                None => Err(SuggestError::Api {
                    status: 503,
                    body: "unavailable".into(),
                }),
            }
        }
    }

    fn samples() -> Vec<Sample> {
        vec![Sample::new(35.0, 0.1, 0.5), Sample::new(28.0, 0.6, 0.05)]
    }

    #[tokio::test]
    async fn fenced_reply_yields_weights() {
        let suggester = WeightSuggester::new(CannedGenerator::replying(
            "```json\n{\"w1\":0.6,\"w2\":0.2,\"w3\":0.2}\n```",
        ));
        let suggestion = suggester.suggest(&samples()).await.unwrap();
        assert_eq!(suggestion.weights, WeightTriple::new(0.6, 0.2, 0.2));
        assert_eq!(suggestion.cleaned, r#"{"w1":0.6,"w2":0.2,"w3":0.2}"#);
    }

    #[tokio::test]
    async fn exactly_one_request_is_made() {
        let suggester = WeightSuggester::new(CannedGenerator::replying("not json"));
        let err = suggester.suggest(&samples()).await.unwrap_err();
        assert!(matches!(err, SuggestError::MalformedWeights { .. }));
        let prompts = suggester.generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"bldDensity\": 0.05"));
    }

    #[tokio::test]
    async fn generator_failure_is_returned() {
        let suggester = WeightSuggester::new(CannedGenerator::failing());
        let err = suggester.suggest(&samples()).await.unwrap_err();
        assert!(matches!(err, SuggestError::Api { status: 503, .. }));
    }
}
