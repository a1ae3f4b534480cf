use std::time::Duration;

use conecta_core::config::{AppConfig, ProviderKind};
use conecta_core::error::AppError;

use crate::embeddings::ollama_embed::OllamaEmbedder;
use crate::embeddings::openai_embed::OpenAiEmbedder;
use crate::embeddings::Embedder;
use crate::llm::ollama_llm::OllamaLlm;
use crate::llm::openai_chat::OpenAiChat;
use crate::llm::Llm;
use crate::ollama::{OllamaClient, DEFAULT_OLLAMA_BASE_URL};
use crate::openai::OpenAiClient;

#[derive(Debug, Clone)]
enum Client {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

/// Embedding and generation backends selected by configuration.
pub struct Providers {
    pub embedder: Box<dyn Embedder>,
    pub llm: Box<dyn Llm>,
    client: Client,
}

impl Providers {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let embed = Duration::from_secs(cfg.embed_timeout_secs);
        let generate = Duration::from_secs(cfg.generate_timeout_secs);
        match cfg.provider {
            ProviderKind::OpenAi => {
                let client = OpenAiClient::new(cfg.base_url.as_deref(), cfg.api_key.as_deref())?
                    .with_timeouts(embed, generate);
                Ok(Self {
                    embedder: Box::new(OpenAiEmbedder::new(client.clone())),
                    llm: Box::new(OpenAiChat::new(client.clone())),
                    client: Client::OpenAi(client),
                })
            }
            ProviderKind::Ollama => {
                let base = cfg.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_BASE_URL);
                let client = OllamaClient::new(base)?.with_timeouts(embed, generate);
                Ok(Self {
                    embedder: Box::new(OllamaEmbedder::new(client.clone())),
                    llm: Box::new(OllamaLlm::new(client.clone())),
                    client: Client::Ollama(client),
                })
            }
        }
    }

    pub fn base_url(&self) -> &str {
        match &self.client {
            Client::OpenAi(c) => c.base_url(),
            Client::Ollama(c) => c.base_url(),
        }
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        match &self.client {
            Client::OpenAi(c) => c.health_check(),
            Client::Ollama(c) => c.health_check(),
        }
    }
}
