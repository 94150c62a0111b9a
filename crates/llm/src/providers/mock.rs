//! Scripted mock provider for tests and offline runs.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use recap_core::{AppError, AppResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_REPLY: &str = "Mock response.";

/// A scripted outcome for one `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Succeed with this text
    Text(String),
    /// Fail with `AppError::RateLimited`
    RateLimited(String),
    /// Fail with `AppError::Llm`
    ServiceError(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn into_result(self, model: &str, prompt_chars: usize) -> AppResult<LlmResponse> {
        match self {
            MockReply::Text(content) => {
                let completion = content.split_whitespace().count() as u32;
                Ok(LlmResponse {
                    content,
                    model: model.to_string(),
                    usage: LlmUsage::new((prompt_chars / 4) as u32, completion),
                    done: true,
                })
            }
            MockReply::RateLimited(details) => Err(AppError::RateLimited(details)),
            MockReply::ServiceError(details) => Err(AppError::Llm(details)),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    by_model: HashMap<String, VecDeque<MockReply>>,
    any_model: VecDeque<MockReply>,
    fallback: Option<MockReply>,
}

/// Mock LLM client with deterministic, scripted replies.
///
/// Replies are looked up per model first, then in the shared queue, then the
/// fallback. The last reply left in a queue is sticky: it keeps answering
/// until more replies are pushed. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockClient {
    script: Mutex<Script>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    /// Create a mock that answers every request with a fixed placeholder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any request that has no scripted reply with `text`.
    pub fn with_fallback(self, reply: MockReply) -> Self {
        lock(&self.script).fallback = Some(reply);
        self
    }

    /// Queue a reply for a specific model.
    pub fn with_model_reply(self, model: impl Into<String>, reply: MockReply) -> Self {
        self.push_model_reply(model, reply);
        self
    }

    /// Queue a reply for whichever model asks next.
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn push_model_reply(&self, model: impl Into<String>, reply: MockReply) {
        lock(&self.script)
            .by_model
            .entry(model.into())
            .or_default()
            .push_back(reply);
    }

    pub fn push_reply(&self, reply: MockReply) {
        lock(&self.script).any_model.push_back(reply);
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }

    /// Number of `complete` calls received.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_reply(&self, model: &str) -> MockReply {
        let mut script = lock(&self.script);

        if let Some(reply) = script.by_model.get_mut(model).and_then(take_sticky) {
            return reply;
        }

        if let Some(reply) = take_sticky(&mut script.any_model) {
            return reply;
        }

        script
            .fallback
            .clone()
            .unwrap_or_else(|| MockReply::text(DEFAULT_REPLY))
    }
}

fn take_sticky(queue: &mut VecDeque<MockReply>) -> Option<MockReply> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        lock(&self.requests).push(request.clone());

        let reply = self.next_reply(&request.model);
        tracing::debug!(model = %request.model, reply = ?reply, "Mock completion");
        reply.into_result(&request.model, request.prompt.len())
    }
}
