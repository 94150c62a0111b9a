//! Parsing JSON arrays out of free-form model output.
//!
//! Models wrap JSON in Markdown fences, add chatter around it, leave
//! trailing commas, or stop mid-array. Parsing runs in stages: strict, then
//! the outermost bracketed span, then a bounded repair. Anything still
//! unparseable is `AppError::MalformedJson`.

use once_cell::sync::Lazy;
use recap_core::{AppError, AppResult};
use regex::Regex;
use serde_json::Value;

static ARRAY_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([\]}])").unwrap());

/// Parse a JSON array from model output.
pub fn parse_json_array(text: &str) -> AppResult<Vec<Value>> {
    let cleaned = strip_code_fences(text);

    if let Some(items) = parse_strict(cleaned) {
        return Ok(items);
    }

    if let Some(span) = ARRAY_SPAN.find(cleaned) {
        if let Some(items) = parse_strict(span.as_str()) {
            tracing::debug!("Parsed JSON array from surrounding text");
            return Ok(items);
        }
    }

    let repaired = repair(cleaned);
    if let Some(items) = repaired.as_deref().and_then(parse_strict) {
        tracing::warn!(items = items.len(), "Parsed JSON array after repair");
        return Ok(items);
    }

    Err(AppError::MalformedJson(preview(cleaned)))
}

fn parse_strict(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Remove a surrounding ```json / ``` fence, if any.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let body = if let Some(start) = trimmed.find("```json") {
        &trimmed[start + "```json".len()..]
    } else if let Some(start) = trimmed.find("```") {
        &trimmed[start + "```".len()..]
    } else {
        return trimmed;
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Close unbalanced brackets and strip trailing commas, starting from the
/// first '['.
fn repair(text: &str) -> Option<String> {
    let start = text.find('[')?;
    let body = &text[start..];

    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in body.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ']' | '}' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut repaired = body.trim_end().to_string();
    if in_string {
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }
    while let Some(close) = stack.pop() {
        repaired.push(close);
    }

    Some(TRAILING_COMMA.replace_all(&repaired, "$1").into_owned())
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_array() {
        let items = parse_json_array(r#"[{"quote": "hello"}]"#).unwrap();
        assert_eq!(items, vec![json!({ "quote": "hello" })]);
    }

    #[test]
    fn test_fenced_array() {
        let text = "```json\n[{\"start\": 1, \"end\": 5, \"title\": \"Intro\"}]\n```";
        let items = parse_json_array(text).unwrap();
        assert_eq!(items[0]["title"], "Intro");
    }

    #[test]
    fn test_bare_fence() {
        let items = parse_json_array("```\n[1, 2]\n```").unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_array_inside_chatter() {
        let text = "Sure! Here are the quotes:\n[{\"quote\": \"a\"}, {\"quote\": \"b\"}]\nHope this helps.";
        let items = parse_json_array(text).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_trailing_commas_repaired() {
        let items = parse_json_array(r#"[{"quote": "a",}, {"quote": "b"},]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["quote"], "b");
    }

    #[test]
    fn test_truncated_output_repaired() {
        let items = parse_json_array(r#"[{"start": 10, "end": 20, "title": "One"}, {"start": 30, "end": 40"#)
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["end"], 40);
    }

    #[test]
    fn test_unterminated_string_closed() {
        let items = parse_json_array(r#"[{"quote": "cut off mid"#).unwrap();
        assert_eq!(items[0]["quote"], "cut off mid");
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let items = parse_json_array(r#"[{"quote": "see [1] and {x}"}"#).unwrap();
        assert_eq!(items[0]["quote"], "see [1] and {x}");
    }

    #[test]
    fn test_object_is_not_an_array() {
        assert!(parse_json_array(r#"{"quote": "a"}"#).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_json_array("I could not find any highlights.").unwrap_err();
        assert!(matches!(err, AppError::MalformedJson(_)));
    }
}
