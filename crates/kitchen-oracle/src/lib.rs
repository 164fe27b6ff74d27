//! Generation-service client for Kitchen Alchemy.
//!
//! When a combination matches no authored or custom recipe, the engine
//! asks a [`Generator`] to invent the result. This crate is the real
//! implementation: it renders a prompt, calls an LLM over HTTP with a
//! deadline, and validates the answer into a [`CandidateIngredient`].
//!
//! # Modules
//!
//! - [`client`] -- [`GenerationClient`], the [`Generator`] implementation.
//! - [`config`] -- Backend selection from environment variables.
//! - [`error`] -- Failure reasons (logged, never shown to the engine).
//! - [`llm`] -- `OpenAI`-compatible and Anthropic backends.
//! - [`parse`] -- Tolerant JSON extraction and field validation.
//! - [`prompt`] -- `minijinja` prompt templates.
//!
//! [`Generator`]: kitchen_core::Generator
//! [`CandidateIngredient`]: kitchen_types::CandidateIngredient
//! [`GenerationClient`]: client::GenerationClient

pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use client::GenerationClient;
pub use config::{BackendConfig, BackendType, DEFAULT_TIMEOUT, OracleConfig};
pub use error::OracleError;
pub use llm::{LlmBackend, candidate_schema, create_backend};
pub use parse::parse_candidate;
pub use prompt::{PromptEngine, RenderedPrompt};
