//! LLM backends that answer a rendered prompt with a candidate ingredient.
//!
//! Enum dispatch instead of trait objects, since async methods are not
//! dyn-compatible. Both backends ask for structured output so the answer
//! is a single JSON object matching [`candidate_schema`]: `OpenAI`-style
//! APIs through a strict `json_schema` response format, Anthropic through
//! a forced tool call whose input is the candidate.

use kitchen_types::Category;

use crate::config::{BackendConfig, BackendType};
use crate::error::OracleError;
use crate::prompt::RenderedPrompt;

/// Upper bound on generated tokens. A candidate is a handful of short
/// fields.
const MAX_TOKENS: u32 = 400;

/// Name of the structured-output schema / forced tool.
const SCHEMA_NAME: &str = "propose_ingredient";

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// An LLM backend that can answer a prompt.
pub enum LlmBackend {
    /// `OpenAI`-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt and return the raw JSON text of the answer.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Backend`] if the HTTP call fails or the
    /// answer cannot be extracted from the response.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, OracleError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// JSON schema of a candidate ingredient.
///
/// The category is restricted to the fixed category names.
pub fn candidate_schema() -> serde_json::Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "description": "Short dish or ingredient name"},
            "glyph": {"type": "string", "description": "A single emoji"},
            "description": {"type": "string", "description": "One sentence"},
            "category": {"type": "string", "enum": categories}
        },
        "required": ["name", "glyph", "description", "category"],
        "additionalProperties": false
    })
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": 0.8,
            "max_tokens": MAX_TOKENS,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": candidate_schema()
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Backend(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleError::Backend(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::Backend(format!("OpenAI response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the message content from a chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, OracleError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            OracleError::Backend("OpenAI response missing choices[0].message.content".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// The candidate schema is offered as the only tool and the model is
/// forced to call it, so the answer arrives as the tool call's `input`.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, OracleError> {
        let url = format!("{}/messages", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ],
            "tools": [{
                "name": SCHEMA_NAME,
                "description": "Propose the ingredient produced by this combination.",
                "input_schema": candidate_schema()
            }],
            "tool_choice": {"type": "tool", "name": SCHEMA_NAME}
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Backend(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleError::Backend(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::Backend(format!("Anthropic response parse failed: {e}")))?;

        extract_anthropic_content(&json)
    }
}

/// Extract the answer from a Messages API response.
///
/// Prefers the first `tool_use` block's input. A plain text block is
/// accepted as a fallback for proxies that drop tool support.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, OracleError> {
    let blocks = json
        .get("content")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| OracleError::Backend("Anthropic response missing content".to_owned()))?;

    let block_of = |kind: &str| {
        blocks
            .iter()
            .find(|b| b.get("type").and_then(serde_json::Value::as_str) == Some(kind))
    };

    if let Some(input) = block_of("tool_use").and_then(|b| b.get("input")) {
        return Ok(serde_json::to_string(input)?);
    }

    block_of("text")
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            OracleError::Backend("Anthropic response has no tool_use or text block".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create an LLM backend from configuration.
pub fn create_backend(config: &BackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn backend_config(backend_type: BackendType) -> BackendConfig {
        BackendConfig {
            backend_type,
            api_url: "http://localhost:1".to_owned(),
            api_key: "test".to_owned(),
            model: "test-model".to_owned(),
        }
    }

    #[test]
    fn extract_openai_content_valid() {
        let json = serde_json::json!({
            "choices": [{
                "message": {
                    "content": "{\"name\": \"Toast\", \"glyph\": \"🍞\"}"
                }
            }]
        });
        assert!(extract_openai_content(&json).unwrap().contains("Toast"));
    }

    #[test]
    fn extract_openai_content_missing_choices() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(extract_openai_content(&json).is_err());
    }

    #[test]
    fn extract_anthropic_prefers_tool_input() {
        let json = serde_json::json!({
            "content": [
                {"type": "text", "text": "Let me think."},
                {
                    "type": "tool_use",
                    "name": SCHEMA_NAME,
                    "input": {"name": "Toast", "glyph": "🍞", "description": "", "category": "bread"}
                }
            ]
        });
        let raw = extract_anthropic_content(&json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["name"], "Toast");
        assert_eq!(value["category"], "bread");
    }

    #[test]
    fn extract_anthropic_falls_back_to_text() {
        let json = serde_json::json!({
            "content": [{"type": "text", "text": "{\"name\": \"Toast\"}"}]
        });
        assert_eq!(extract_anthropic_content(&json).unwrap(), "{\"name\": \"Toast\"}");
    }

    #[test]
    fn extract_anthropic_content_missing() {
        assert!(extract_anthropic_content(&serde_json::json!({"content": []})).is_err());
        assert!(extract_anthropic_content(&serde_json::json!({"type": "error"})).is_err());
    }

    #[test]
    fn schema_lists_every_category() {
        let schema = candidate_schema();
        let listed = schema["properties"]["category"]["enum"].as_array().unwrap();
        assert_eq!(listed.len(), Category::ALL.len());
        assert!(listed.iter().any(|c| c == "dessert"));
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn create_backend_dispatches_correctly() {
        assert_eq!(
            create_backend(&backend_config(BackendType::OpenAi)).name(),
            "openai-compatible"
        );
        assert_eq!(
            create_backend(&backend_config(BackendType::Anthropic)).name(),
            "anthropic"
        );
    }
}
