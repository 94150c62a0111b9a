//! Turning rendered prompts into backend requests.

use recap_llm::LlmRequest;
use recap_prompt::BuiltPrompt;
use std::collections::HashMap;

/// Build a request for `model` from a rendered prompt.
pub(crate) fn request_for(prompt: BuiltPrompt, model: &str) -> LlmRequest {
    let request = LlmRequest::new(prompt.user, model);
    match prompt.system {
        Some(system) => request.with_system(system),
        None => request,
    }
}

/// Template variables from string pairs.
pub(crate) fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Handlebars truthiness: empty is false.
pub(crate) fn flag(value: bool) -> String {
    if value {
        "true".to_string()
    } else {
        String::new()
    }
}
