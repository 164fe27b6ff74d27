//! Configuration for the generation client.
//!
//! Everything comes from environment variables. When no backend is
//! configured the client is simply not built and the game runs with
//! generation disabled.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::OracleError;

/// Default deadline for one generation request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Which API to call and how.
    pub backend: BackendConfig,
    /// Deadline for a single request, network and parsing included.
    pub timeout: Duration,
    /// Directory whose `system.j2` / `request.j2` replace the built-in
    /// prompt templates.
    pub templates_dir: Option<PathBuf>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// The API flavor.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions (`OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name, accepting the common aliases.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Config`] for an unrecognized name.
    pub fn parse(name: &str) -> Result<Self, OracleError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(OracleError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

impl OracleConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `KITCHEN_LLM_BACKEND` is unset or empty.
    ///
    /// Required once a backend is named:
    /// - `KITCHEN_LLM_API_URL` -- API base URL
    /// - `KITCHEN_LLM_API_KEY` -- API key
    /// - `KITCHEN_LLM_MODEL` -- model name
    ///
    /// Optional:
    /// - `KITCHEN_LLM_TIMEOUT_MS` -- request deadline (default 10000)
    /// - `KITCHEN_TEMPLATES_DIR` -- prompt template overrides
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Config`] if a backend is named but the rest of
    /// its configuration is missing or malformed.
    pub fn from_env() -> Result<Option<Self>, OracleError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`OracleConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, OracleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let Some(backend_name) = var("KITCHEN_LLM_BACKEND") else {
            return Ok(None);
        };
        let required = |name: &str| {
            var(name).ok_or_else(|| OracleError::Config(format!("missing required env var {name}")))
        };

        let backend = BackendConfig {
            backend_type: BackendType::parse(&backend_name)?,
            api_url: required("KITCHEN_LLM_API_URL")?.trim_end_matches('/').to_owned(),
            api_key: required("KITCHEN_LLM_API_KEY")?,
            model: required("KITCHEN_LLM_MODEL")?,
        };

        let timeout = match var("KITCHEN_LLM_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| {
                    OracleError::Config(format!("invalid KITCHEN_LLM_TIMEOUT_MS: {e}"))
                })?;
                if ms == 0 {
                    return Err(OracleError::Config(String::from(
                        "KITCHEN_LLM_TIMEOUT_MS must be at least 1",
                    )));
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Some(Self {
            backend,
            timeout,
            templates_dir: var("KITCHEN_TEMPLATES_DIR").map(PathBuf::from),
        }))
    }
}
