//! Error types for the generation client.
//!
//! None of these reach the resolution engine: the client logs them and
//! answers `None`, which the engine turns into a "no recipe found" miss.

/// Errors that can occur while asking the generation service.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Configuration is invalid or incomplete.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// The backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// The backend took longer than the configured deadline.
    #[error("generation timed out after {0}ms")]
    Timeout(u128),

    /// The response could not be turned into a candidate ingredient.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
