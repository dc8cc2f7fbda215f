//! Integration with a hosted generative-AI service.
//!
//! The rest of the crate only sees [`AiProvider`]; the HTTP client lives in
//! [`client`] and the prompt text in [`prompts`].

pub mod client;
pub mod prompts;

use std::{collections::VecDeque, sync::Mutex};

use thiserror::Error;

pub use client::GenerativeClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service is not configured")]
    NotConfigured,
    #[error("AI request failed: {0}")]
    Http(String),
    #[error("AI service returned status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("AI service returned an empty response")]
    EmptyResponse,
    #[error("AI response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything able to turn a prompt into a text completion.
pub trait AiProvider: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

/// Removes a surrounding Markdown code fence (```json ... ```), if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the first JSON object found in a completion.
pub fn extract_json(text: &str) -> Result<serde_json::Value, AiError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let start = body.find('{').unwrap_or(0);
    let end = body.rfind('}').map(|idx| idx + 1).unwrap_or(body.len());
    let slice = if start < end { &body[start..end] } else { body };
    Ok(serde_json::from_str(slice)?)
}

/// Provider that replays canned responses in order; used offline and in tests.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String, AiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, AiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AiProvider for ScriptedProvider {
    fn complete(&self, prompt: &str) -> Result<String, AiError> {
        if let Ok(mut guard) = self.prompts.lock() {
            guard.push(prompt.to_string());
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut guard| guard.pop_front())
            .unwrap_or(Err(AiError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let value = extract_json("Sure! {\"action\": \"expense\", \"amount\": 4} Enjoy").unwrap();
        assert_eq!(value["action"], "expense");
        assert!(matches!(extract_json("   "), Err(AiError::EmptyResponse)));
        assert!(matches!(extract_json("not json"), Err(AiError::Json(_))));
    }

    #[test]
    fn scripted_provider_replays_then_runs_dry() {
        let provider = ScriptedProvider::new(vec![Ok("one".into())]);
        assert_eq!(provider.complete("p1").unwrap(), "one");
        assert!(matches!(
            provider.complete("p2"),
            Err(AiError::EmptyResponse)
        ));
        assert_eq!(provider.prompts(), vec!["p1".to_string(), "p2".to_string()]);
    }
}
