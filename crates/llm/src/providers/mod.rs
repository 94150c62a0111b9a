//! LLM provider implementations.

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use ollama::OllamaClient;

use recap_core::AppError;
use reqwest::StatusCode;

/// Map a non-success HTTP status to the backend error taxonomy.
pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        AppError::RateLimited(format!("{} API error (429): {}", provider, body))
    } else {
        AppError::Llm(format!("{} API error ({}): {}", provider, status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_classifies_quota() {
        let err = status_error("Gemini", StatusCode::TOO_MANY_REQUESTS, "requests_per_day");
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("requests_per_day"));

        let err = status_error("Ollama", StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, AppError::Llm(_)));
    }
}
