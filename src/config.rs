use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{SuggestError, SuggestResult};

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_use_system_proxy() -> bool {
    true
}

/// Where and how the weight suggestion is requested.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_use_system_proxy")]
    pub use_system_proxy: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            api_key_env: default_api_key_env(),
            use_system_proxy: default_use_system_proxy(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_str(text: &str) -> Result<Self> {
        let config: GeneratorConfig =
            serde_yaml::from_str(text).context("Failed to parse generator config")?;
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.api_version,
            self.model
        )
    }

    pub fn api_key(&self) -> SuggestResult<String> {
        match env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SuggestError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Reads a YAML config; without a file every field takes its default.
    pub fn load(&self, file: Option<&Path>) -> Result<GeneratorConfig> {
        let Some(file) = file else {
            return Ok(GeneratorConfig::default());
        };
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        GeneratorConfig::from_str(&data).with_context(|| format!("in {}", path.display()))
    }
}
