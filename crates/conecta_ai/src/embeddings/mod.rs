use conecta_core::error::{codes, AppError};

pub trait Embedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError>;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        (**self).embed(model, input)
    }
}

pub mod ollama_embed;
pub mod openai_embed;

/// Reject empty vectors and vectors with NaN or infinite components.
pub(crate) fn check_vector(v: Vec<f32>) -> Result<Vec<f32>, AppError> {
    if v.is_empty() {
        return Err(AppError::new(
            codes::AI_EMBEDDINGS_FAILED,
            "Embeddings response was empty",
        ));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(AppError::new(
            codes::AI_EMBEDDINGS_FAILED,
            "Embeddings response contained non-finite values",
        ));
    }
    Ok(v)
}

/// Cap request text at 12 000 bytes, cut on a char boundary.
pub(crate) fn bounded_input(input: &str) -> &str {
    const MAX_INPUT_BYTES: usize = 12_000;
    if input.len() <= MAX_INPUT_BYTES {
        return input;
    }
    let mut end = MAX_INPUT_BYTES;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}
