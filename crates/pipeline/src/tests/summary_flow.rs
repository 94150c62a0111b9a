//! Summary path: chunk, score, skeleton, synthesize.

use super::summarizer;
use crate::config::PipelineConfig;
use crate::progress::ProgressReporter;
use crate::summarizer::EMPTY_SKELETON_MESSAGE;
use crate::text::Tokenizer;
use crate::types::{FormatMode, LengthPreference, TextStats};
use recap_core::{AppError, AppResult, CancellationToken};
use recap_llm::{MockClient, MockReply};
use std::sync::{Arc, Mutex};

/// Reports blank sentences, so no chunk survives.
struct BlankTokenizer;

impl Tokenizer for BlankTokenizer {
    fn sentences(&self, _text: &str) -> AppResult<Vec<String>> {
        Ok(vec![String::new(), String::new()])
    }

    fn words(&self, text: &str) -> AppResult<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

#[tokio::test]
async fn test_summary_keeps_proper_noun_sentence() {
    let local = Arc::new(MockClient::new().with_reply(MockReply::text("Alice and Bob met on a nice day.")));
    let cloud = Arc::new(MockClient::new());

    let result = summarizer(local.clone(), cloud.clone(), PipelineConfig::default())
        .summarize(
            "Alice met Bob. The weather was nice.",
            LengthPreference::Medium,
            FormatMode::Paragraph,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.summary_text, "Alice and Bob met on a nice day.");
    let stats = result.stats.unwrap();
    assert_eq!(
        stats.original,
        TextStats {
            words: 7,
            sentences: 2,
            chars: 36,
        }
    );
    assert_eq!(stats.summary.words, 8);

    let requests = local.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.ends_with("Facts: Alice met Bob."));
    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn test_long_document_single_synthesis_call() {
    let text = (0..200)
        .map(|i| format!("Report {} covers the budget of district {} in detail.", i, i % 7))
        .collect::<Vec<_>>()
        .join(" ");
    let local = Arc::new(MockClient::new().with_reply(MockReply::text("Budget overview.")));

    let result = summarizer(local.clone(), Arc::new(MockClient::new()), PipelineConfig::default())
        .summarize(&text, LengthPreference::Short, FormatMode::Bullet, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.summary_text, "Budget overview.");
    assert_eq!(local.call_count(), 1);

    let prompt = &local.requests()[0].prompt;
    assert!(prompt.starts_with("You are a professional analyst."));
    assert!(prompt.contains("Task: Provide a high-level executive summary of the core message."));
    assert!(prompt.contains("Facts: Report 0 covers"));
}

#[tokio::test]
async fn test_empty_input_short_circuits() {
    let local = Arc::new(MockClient::new());

    let result = summarizer(local.clone(), Arc::new(MockClient::new()), PipelineConfig::default())
        .summarize(" \n\t ", LengthPreference::Medium, FormatMode::Paragraph, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.summary_text, "");
    assert!(result.stats.is_none());
    assert_eq!(local.call_count(), 0);
}

#[tokio::test]
async fn test_empty_skeleton_message() {
    let local = Arc::new(MockClient::new());

    let result = summarizer(local.clone(), Arc::new(MockClient::new()), PipelineConfig::default())
        .with_tokenizer(Arc::new(BlankTokenizer))
        .summarize("Some text here.", LengthPreference::Medium, FormatMode::Paragraph, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.summary_text, EMPTY_SKELETON_MESSAGE);
    assert!(result.stats.is_none());
    assert_eq!(local.call_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_still_returns_stats() {
    let local = Arc::new(MockClient::new().with_fallback(MockReply::ServiceError("ollama not running".to_string())));

    let result = summarizer(local, Arc::new(MockClient::new()), PipelineConfig::default())
        .summarize(
            "Alice met Bob. The weather was nice.",
            LengthPreference::Medium,
            FormatMode::Paragraph,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.summary_text.starts_with("[ERROR] Local Synthesis Failed"));
    assert!(result.summary_text.ends_with("Backup Skeleton:\nAlice met Bob."));
    assert!(result.stats.is_some());
}

#[tokio::test]
async fn test_cancelled_summary() {
    let local = Arc::new(MockClient::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = summarizer(local.clone(), Arc::new(MockClient::new()), PipelineConfig::default())
        .summarize("Alice met Bob.", LengthPreference::Medium, FormatMode::Paragraph, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Cancelled));
    assert_eq!(local.call_count(), 0);
}

#[tokio::test]
async fn test_progress_phases_in_order() {
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = phases.clone();
    let reporter = ProgressReporter::new(Arc::new(move |event| {
        sink.lock().unwrap().push(event.phase);
    }));

    summarizer(Arc::new(MockClient::new()), Arc::new(MockClient::new()), PipelineConfig::default())
        .with_progress(reporter)
        .summarize(
            "Alice met Bob. The weather was nice.",
            LengthPreference::Medium,
            FormatMode::Paragraph,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(*phases.lock().unwrap(), vec!["chunk", "score", "synthesize"]);
}

#[tokio::test]
async fn test_visual_summary_goes_to_cloud() {
    let local = Arc::new(MockClient::new());
    let cloud = Arc::new(MockClient::new().with_reply(MockReply::text("A launch video.")));

    let summary = summarizer(local.clone(), cloud.clone(), PipelineConfig::default())
        .synthesize_with_visual_context(
            "",
            &[recap_llm::Frame::jpeg("AAAA")],
            &crate::types::VideoMetadata::default(),
            LengthPreference::Medium,
            FormatMode::Paragraph,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary, "A launch video.");
    assert_eq!(local.call_count(), 0);
    assert!(!cloud.requests()[0].prompt.contains("[NO FRAMES AVAILABLE]"));
}
