//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Only the subset needed for a single text prompt is modelled: one user turn
//! in, the text parts of the first candidate out.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::GeneratorConfig,
    error::{SuggestError, SuggestResult},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// What came back from one generation call.
#[derive(Debug, Clone)]
pub struct GenerationReply {
    /// Response body exactly as received.
    pub raw_body: String,
    /// Concatenated text of the first candidate.
    pub text: String,
}

pub trait TextGenerator {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = SuggestResult<GenerationReply>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiClient {
    http: Client,
    config: GeneratorConfig,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client, reading the credential from the configured variable.
    pub fn from_env(config: GeneratorConfig) -> SuggestResult<Self> {
        let api_key = config.api_key()?;
        Self::new(config, api_key)
    }

    pub fn new(config: GeneratorConfig, api_key: impl Into<String>) -> SuggestResult<Self> {
        let mut builder = Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config,
            api_key: api_key.into(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> SuggestResult<GenerationReply> {
        let url = self.config.generate_url();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        debug!(%url, model = %self.config.model, "sending generateContent request");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw_body = response.text().await?;
        debug!(status = status.as_u16(), bytes = raw_body.len(), "response received");
        if !status.is_success() {
            return Err(SuggestError::Api {
                status: status.as_u16(),
                body: raw_body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw_body).map_err(SuggestError::Decode)?;
        let text = parsed.text().ok_or(SuggestError::EmptyReply)?;
        Ok(GenerationReply { raw_body, text })
    }
}
