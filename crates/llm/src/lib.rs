//! LLM integration crate for recap.
//!
//! A provider-agnostic, non-streaming completion interface used by the
//! summarization and highlight pipelines.
//!
//! # Providers
//! - **Ollama**: local runtime (default), text synthesis and quote extraction
//! - **Gemini**: multimodal video analysis and highlight candidates
//! - **Mock**: scripted replies for tests
//!
//! # Example
//! ```no_run
//! use recap_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "gemma3:12b");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{Frame, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::mock::MockReply;
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use types::ProviderType;
