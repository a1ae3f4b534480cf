use std::fmt;
use std::time::Duration;

use conecta_core::error::{codes, AppError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for an OpenAI-compatible HTTP API (`/embeddings`, `/chat/completions`).
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    embed_timeout: Duration,
    generate_timeout: Duration,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("embed_timeout", &self.embed_timeout)
            .field("generate_timeout", &self.generate_timeout)
            .finish()
    }
}

fn allowed_base_url(base_url: &str) -> bool {
    base_url.starts_with("https://")
        || base_url.starts_with("http://127.0.0.1:")
        || base_url.starts_with("http://localhost:")
}

impl OpenAiClient {
    /// Remote endpoints must use TLS; plain HTTP is accepted only for local gateways.
    pub fn new(base_url: Option<&str>, api_key: Option<&str>) -> Result<Self, AppError> {
        let base_url = base_url
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !allowed_base_url(&base_url) || base_url.contains('@') {
            return Err(AppError::new(
                codes::AI_PROVIDER_INVALID,
                "OpenAI base URL must be https (or a local http gateway)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::new(codes::AI_PROVIDER_INVALID, "OpenAI API key is not set")
                    .with_details("set OPENAI_API_KEY or api_key in the config file")
            })?
            .to_string();

        Ok(Self {
            base_url,
            api_key,
            embed_timeout: Duration::from_secs(10),
            generate_timeout: Duration::from_secs(30),
        })
    }

    pub fn with_timeouts(mut self, embed: Duration, generate: Duration) -> Self {
        self.embed_timeout = embed;
        self.generate_timeout = generate;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    pub fn embed_timeout(&self) -> Duration {
        self.embed_timeout
    }

    pub fn generate_timeout(&self) -> Duration {
        self.generate_timeout
    }

    /// Health checks share the embedding timeout.
    pub(crate) fn health_timeout(&self) -> Duration {
        self.embed_timeout
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/models", self.base_url);
        let resp = ureq::get(&url)
            .set("Authorization", &self.authorization())
            .timeout(self.health_timeout())
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new(codes::AI_PROVIDER_UNHEALTHY, "OpenAI health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(AppError::new(
                codes::AI_PROVIDER_UNHEALTHY,
                "OpenAI health check failed",
            )
            .with_details(format!("status={status}"))
            .with_retryable(status == 429 || status >= 500)),
            Err(e) => Err(AppError::new(
                codes::AI_PROVIDER_UNREACHABLE,
                "Failed to reach the OpenAI endpoint",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}
