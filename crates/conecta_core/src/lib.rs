pub mod analytics;
pub mod cache;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod text;

#[cfg(test)]
mod tests {
    use super::error::{codes, AppError};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new(codes::AI_EMBEDDINGS_FAILED, "embed failed").with_retryable(true);
        assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
        assert_eq!(err.message, "embed failed");
        assert!(err.retryable);
        assert!(err.is(codes::AI_EMBEDDINGS_FAILED));
    }

    #[test]
    fn app_error_display_includes_details() {
        let err = AppError::data_unavailable("FAQ source missing").with_details("path=faq_data.csv");
        assert_eq!(
            err.to_string(),
            "[DATA_UNAVAILABLE] FAQ source missing (path=faq_data.csv)"
        );
    }
}
