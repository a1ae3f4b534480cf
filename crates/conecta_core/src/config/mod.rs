use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};

pub const DEFAULT_CONFIG_NAME: &str = "conecta";
pub const ENV_PREFIX: &str = "CONECTA";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_WORDS: usize = 150;
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Squared distance between two unit vectors lies in [0, 4].
const MAX_SQUARED_UNIT_DISTANCE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => f.write_str("openai"),
            ProviderKind::Ollama => f.write_str("ollama"),
        }
    }
}

/// Runtime settings for the assistant.
///
/// Resolution order: built-in defaults, then `conecta.toml` (or an explicit path), then
/// `CONECTA_*` environment variables. The API key falls back to `OPENAI_API_KEY`.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub provider: ProviderKind,
    /// Provider base URL; `None` selects the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    pub faq_path: PathBuf,
    pub embeddings_path: PathBuf,
    pub index_path: PathBuf,
    /// Largest squared distance (unit vectors) still accepted as a FAQ match.
    pub similarity_threshold: f32,
    pub max_words: usize,
    pub embed_timeout_secs: u64,
    pub generate_timeout_secs: u64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("embedding_model", &self.embedding_model)
            .field("chat_model", &self.chat_model)
            .field("faq_path", &self.faq_path)
            .field("embeddings_path", &self.embeddings_path)
            .field("index_path", &self.index_path)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("max_words", &self.max_words)
            .field("embed_timeout_secs", &self.embed_timeout_secs)
            .field("generate_timeout_secs", &self.generate_timeout_secs)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            base_url: None,
            api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            faq_path: PathBuf::from("faq_data.csv"),
            embeddings_path: PathBuf::from("faq_embeddings.json"),
            index_path: PathBuf::from("faq_index.bin"),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_words: DEFAULT_MAX_WORDS,
            embed_timeout_secs: 10,
            generate_timeout_secs: 30,
        }
    }
}

fn config_error(message: &str, e: impl fmt::Display) -> AppError {
    AppError::new(codes::CONFIG_INVALID, message).with_details(e.to_string())
}

impl AppConfig {
    /// Load from an explicit file (must exist) or from an optional `conecta.toml` in the
    /// working directory, layered under `CONECTA_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let d = AppConfig::default();
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let built = Config::builder()
            .set_default("provider", d.provider.to_string())
            .and_then(|b| b.set_default("embedding_model", d.embedding_model.clone()))
            .and_then(|b| b.set_default("chat_model", d.chat_model.clone()))
            .and_then(|b| b.set_default("faq_path", d.faq_path.to_string_lossy().to_string()))
            .and_then(|b| {
                b.set_default("embeddings_path", d.embeddings_path.to_string_lossy().to_string())
            })
            .and_then(|b| b.set_default("index_path", d.index_path.to_string_lossy().to_string()))
            .and_then(|b| b.set_default("similarity_threshold", f64::from(d.similarity_threshold)))
            .and_then(|b| b.set_default("max_words", d.max_words as i64))
            .and_then(|b| b.set_default("embed_timeout_secs", d.embed_timeout_secs as i64))
            .and_then(|b| b.set_default("generate_timeout_secs", d.generate_timeout_secs as i64))
            .map_err(|e| config_error("Failed to set configuration defaults", e))?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| config_error("Failed to read configuration", e))?;

        let mut cfg: AppConfig = built
            .try_deserialize()
            .map_err(|e| config_error("Failed to decode configuration", e))?;

        if cfg.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            cfg.api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=MAX_SQUARED_UNIT_DISTANCE).contains(&t) {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "similarity_threshold must be within [0, 4]",
            )
            .with_details(format!("similarity_threshold={t}")));
        }
        if self.max_words == 0 {
            return Err(AppError::new(codes::CONFIG_INVALID, "max_words must be at least 1"));
        }
        if self.embed_timeout_secs == 0 || self.generate_timeout_secs == 0 {
            return Err(AppError::new(codes::CONFIG_INVALID, "Timeouts must be positive")
                .with_details(format!(
                    "embed_timeout_secs={}; generate_timeout_secs={}",
                    self.embed_timeout_secs, self.generate_timeout_secs
                )));
        }
        if self.embedding_model.trim().is_empty() || self.chat_model.trim().is_empty() {
            return Err(AppError::new(codes::CONFIG_INVALID, "Model names must not be empty"));
        }
        Ok(())
    }

    /// Word budget for generated answers is mirrored in the token budget.
    pub fn max_tokens(&self) -> u32 {
        u32::try_from(self.max_words.saturating_mul(2)).unwrap_or(u32::MAX)
    }
}
