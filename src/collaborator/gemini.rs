//! Gemini client for natural-language interpretation and phrasing.
//!
//! Synchronous `ureq` calls against the `generateContent` endpoint, bounded
//! by the configured timeout. One retry on transport failure, then
//! `CollaboratorUnavailable`. HTTP status errors (auth included) are not
//! retried.

use std::time::Duration;

use serde_json::json;

use crate::config::Config;
use crate::error::TaskpilotError;
use crate::intent::IntentEnvelope;

use super::context;
use super::Collaborator;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    config: Config,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(config: Config, base_url: impl Into<String>) -> Self {
        Self {
            config,
            base_url: base_url.into(),
        }
    }

    /// One generateContent round trip, returning the model's text.
    fn generate(&self, prompt: &str) -> Result<String, TaskpilotError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        );
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        })
        .to_string();

        let mut last_transport = String::new();
        for attempt in 0..2 {
            match agent
                .post(&url)
                .set("Content-Type", "application/json")
                .set("x-goog-api-key", &self.config.api_key)
                .send_string(&body)
            {
                Ok(resp) => return extract_text(resp),
                Err(ureq::Error::Status(401 | 403, _)) => {
                    return Err(TaskpilotError::collaborator_unavailable(
                        "Gemini rejected the API key (HTTP 401/403)",
                    ));
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(TaskpilotError::collaborator_unavailable(format!(
                        "Gemini returned HTTP {code}"
                    )));
                }
                Err(ureq::Error::Transport(t)) => {
                    last_transport = t.to_string();
                    if attempt == 0 {
                        continue;
                    }
                }
            }
        }
        Err(TaskpilotError::collaborator_unavailable(format!(
            "Gemini unreachable: {last_transport}"
        )))
    }
}

fn extract_text(resp: ureq::Response) -> Result<String, TaskpilotError> {
    let body = resp
        .into_string()
        .map_err(|e| TaskpilotError::collaborator_unavailable(e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| TaskpilotError::collaborator_unavailable(format!("bad response body: {e}")))?;
    value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            TaskpilotError::collaborator_unavailable("response contained no text candidate")
        })
}

impl Collaborator for GeminiClient {
    fn interpret(
        &self,
        command: &str,
        context: &serde_json::Value,
    ) -> Result<IntentEnvelope, TaskpilotError> {
        let prompt = context::interpret_prompt(command, context);
        let raw = self.generate(&prompt)?;
        // Decoding is total: anything unusable becomes Unrecognized.
        Ok(IntentEnvelope::decode(&raw))
    }

    fn compose(&self, prompt: &str) -> Result<String, TaskpilotError> {
        self.generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn test_config() -> Config {
        Config {
            api_key: "test-key".into(),
            model: "gemini-2.0-flash".into(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn unreachable_endpoint_is_collaborator_unavailable() {
        // Port 1 refuses connections immediately.
        let client = GeminiClient::with_base_url(test_config(), "http://127.0.0.1:1");
        let err = client.compose("hello").unwrap_err();
        assert_eq!(err.code, ErrorCode::CollaboratorUnavailable);
    }

    #[test]
    fn interpret_against_unreachable_endpoint_errors_not_panics() {
        let client = GeminiClient::with_base_url(test_config(), "http://127.0.0.1:1");
        let err = client
            .interpret("create a project", &serde_json::json!({"projects": []}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CollaboratorUnavailable);
    }
}
