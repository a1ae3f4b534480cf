use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes shared by every layer. The CLI prints them verbatim.
pub mod codes {
    /// FAQ source, embeddings file, or index missing or corrupt at load time.
    pub const DATA_UNAVAILABLE: &str = "DATA_UNAVAILABLE";
    pub const AI_EMBEDDINGS_FAILED: &str = "AI_EMBEDDINGS_FAILED";
    pub const AI_GENERATION_FAILED: &str = "AI_GENERATION_FAILED";
    pub const AI_INDEX_BUILD_FAILED: &str = "AI_INDEX_BUILD_FAILED";
    pub const AI_PROVIDER_INVALID: &str = "AI_PROVIDER_INVALID";
    pub const AI_PROVIDER_UNREACHABLE: &str = "AI_PROVIDER_UNREACHABLE";
    pub const AI_PROVIDER_UNHEALTHY: &str = "AI_PROVIDER_UNHEALTHY";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const ASK_EMPTY_QUESTION: &str = "ASK_EMPTY_QUESTION";
}

/// Single structured error shape used by the core, the AI layer and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(codes::DATA_UNAVAILABLE, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
