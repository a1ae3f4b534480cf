use std::time::Duration;

use conecta_core::error::{codes, AppError};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    embed_timeout: Duration,
    generate_timeout: Duration,
}

fn valid_local_base_url(base_url: &str) -> bool {
    if base_url == "http://127.0.0.1" {
        return true;
    }
    let Some(port) = base_url.strip_prefix("http://127.0.0.1:") else {
        return false;
    };
    // Port only: rejects `127.0.0.1:11434/api`, `127.0.0.1:@evil`, empty and out-of-range ports.
    matches!(port.parse::<u16>(), Ok(p) if p != 0) && port.chars().all(|c| c.is_ascii_digit())
}

impl OllamaClient {
    /// Create a client for a local Ollama. This is strictly limited to `127.0.0.1`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !valid_local_base_url(&base_url) {
            return Err(AppError::new(
                codes::AI_PROVIDER_INVALID,
                "Ollama base URL must be localhost (127.0.0.1)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self {
            base_url,
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

    pub fn embed_timeout(&self) -> Duration {
        self.embed_timeout
    }

    pub fn generate_timeout(&self) -> Duration {
        self.generate_timeout
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = ureq::get(&url).timeout(Duration::from_millis(800)).call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new(codes::AI_PROVIDER_UNHEALTHY, "Ollama health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(AppError::new(
                codes::AI_PROVIDER_UNHEALTHY,
                "Ollama health check failed",
            )
            .with_details(format!("status={status}"))),
            Err(e) => Err(AppError::new(
                codes::AI_PROVIDER_UNREACHABLE,
                "Failed to reach Ollama on 127.0.0.1",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}
