use conecta_core::error::{codes, AppError};

/// One-shot chat request: a fixed system framing plus the user's question.
#[derive(Debug, Clone, Copy)]
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: u32,
}

pub trait Llm {
    fn generate(&self, model: &str, prompt: &ChatPrompt<'_>) -> Result<String, AppError>;
}

impl<L: Llm + ?Sized> Llm for Box<L> {
    fn generate(&self, model: &str, prompt: &ChatPrompt<'_>) -> Result<String, AppError> {
        (**self).generate(model, prompt)
    }
}

pub mod ollama_llm;
pub mod openai_chat;

pub(crate) fn check_completion(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::new(
            codes::AI_GENERATION_FAILED,
            "Generation response was empty",
        ));
    }
    Ok(text.trim().to_string())
}
