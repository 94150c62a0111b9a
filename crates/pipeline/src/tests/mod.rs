//! End-to-end pipeline scenarios against the scripted mock backend.

mod summary_flow;

use crate::config::PipelineConfig;
use crate::summarizer::Summarizer;
use recap_core::{AppResult, CancellationToken};
use recap_llm::{LlmClient, LlmRequest, LlmResponse, MockClient};
use recap_prompt::PromptSet;
use std::sync::Arc;

/// A summarizer whose local and cloud backends are separate mocks.
fn summarizer(local: Arc<MockClient>, cloud: Arc<MockClient>, config: PipelineConfig) -> Summarizer {
    Summarizer::new(
        local,
        cloud,
        Arc::new(PromptSet::builtin().unwrap()),
        config,
    )
}

/// Backend that answers through a mock, then trips a cancellation token,
/// like a user pressing Ctrl-C while the first request is in flight.
struct CancelAfterFirstCall {
    inner: MockClient,
    token: CancellationToken,
}

#[async_trait::async_trait]
impl LlmClient for CancelAfterFirstCall {
    fn provider_name(&self) -> &str {
        "cancel-after-first"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let response = self.inner.complete(request).await;
        self.token.cancel();
        response
    }
}
