use std::{env, time::Duration};

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use ureq::Agent;

use crate::config::AiSettings;

use super::{AiError, AiProvider};

/// Blocking client for a `generateContent`-style generative-AI endpoint.
pub struct GenerativeClient {
    agent: Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GenerativeClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: String) -> Self {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    /// Builds a client from settings, reading the key from the configured env var.
    pub fn from_settings(settings: &AiSettings) -> Result<Self, AiError> {
        if !settings.enabled {
            return Err(AiError::NotConfigured);
        }
        let api_key = env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AiError::NotConfigured)?;
        Ok(Self::with_timeout(
            settings.endpoint.clone(),
            settings.model.clone(),
            api_key,
            Duration::from_secs(settings.timeout_secs.max(1)),
        ))
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
    }
}

impl AiProvider for GenerativeClient {
    fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        debug!(model = %self.model, prompt_len = prompt.len(), "sending AI request");
        let response = match self
            .agent
            .post(&self.url())
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                warn!(code, "AI service rejected request");
                return Err(AiError::Status { code, body });
            }
            Err(err) => {
                warn!(error = %err, "AI transport failure");
                return Err(AiError::Http(err.to_string()));
            }
        };
        let text = response
            .into_string()
            .map_err(|err| AiError::Http(err.to_string()))?;
        debug!(response_len = text.len(), "AI response received");
        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        parsed.first_text().ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_is_taken_from_first_non_empty_part() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"  "},{"text":"hello"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("hello"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.first_text().is_none());
    }

    #[test]
    fn disabled_settings_are_not_configured() {
        let settings = AiSettings {
            enabled: false,
            ..AiSettings::default()
        };
        assert!(matches!(
            GenerativeClient::from_settings(&settings),
            Err(AiError::NotConfigured)
        ));
    }

    #[test]
    fn url_contains_model_and_trims_endpoint_slash() {
        let client = GenerativeClient::new("https://ai.example/v1beta/", "flash", "k".into());
        assert_eq!(
            client.url(),
            "https://ai.example/v1beta/models/flash:generateContent?key=k"
        );
    }
}
