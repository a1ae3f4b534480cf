use conecta_core::error::AppError;

const BODY_SNIPPET_CHARS: usize = 300;

/// Map a failed `ureq` call onto the caller's error code.
///
/// Transport failures (DNS, refused, timeout) and 429/5xx responses are retryable; other
/// statuses are not.
pub(crate) fn call_failed(code: &str, message: &str, err: ureq::Error) -> AppError {
    match err {
        ureq::Error::Status(status, resp) => {
            let body = resp.into_string().unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
            AppError::new(code, message)
                .with_details(format!("status={status}; body={snippet}"))
                .with_retryable(status == 429 || status >= 500)
        }
        ureq::Error::Transport(t) => AppError::new(code, message)
            .with_details(t.to_string())
            .with_retryable(true),
    }
}

pub(crate) fn encode_failed(code: &str, e: serde_json::Error) -> AppError {
    AppError::new(code, "Failed to encode provider request").with_details(e.to_string())
}

pub(crate) fn decode_failed(code: &str, e: std::io::Error) -> AppError {
    AppError::new(code, "Failed to decode provider response").with_details(e.to_string())
}
