//! Prompt template loading and rendering via `minijinja`.
//!
//! Two templates make up a prompt: `system.j2` sets the rules and lists
//! the allowed categories, `request.j2` describes the combination. Both
//! ship inside the binary; a templates directory may override either so
//! operators can tune the prompt without recompiling.

use std::path::Path;

use kitchen_types::{Category, GenerationRequest};
use minijinja::{Environment, context};
use tracing::debug;

use crate::error::OracleError;

const BUILTIN_SYSTEM: &str = include_str!("../templates/system.j2");
const BUILTIN_REQUEST: &str = include_str!("../templates/request.j2");

/// The rendered prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message with the rules of the game.
    pub system: String,
    /// User message describing the combination.
    pub user: String,
}

/// Holds the prompt templates.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// A prompt engine using only the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] if a built-in template fails to
    /// compile.
    pub fn builtin() -> Result<Self, OracleError> {
        let mut env = Environment::new();
        add(&mut env, "system", BUILTIN_SYSTEM.to_owned())?;
        add(&mut env, "request", BUILTIN_REQUEST.to_owned())?;
        Ok(Self { env })
    }

    /// Built-in templates, with any `system.j2` or `request.j2` found in
    /// `dir` taking their place.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] if an override exists but cannot
    /// be read or compiled.
    pub fn with_overrides(dir: &Path) -> Result<Self, OracleError> {
        let mut engine = Self::builtin()?;
        for name in ["system", "request"] {
            let path = dir.join(format!("{name}.j2"));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                OracleError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            add(&mut engine.env, name, source)?;
            debug!(template = name, path = %path.display(), "prompt template overridden");
        }
        Ok(engine)
    }

    /// Render the prompt for one generation request.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] if rendering fails.
    pub fn render(&self, request: &GenerationRequest) -> Result<RenderedPrompt, OracleError> {
        let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        let ctx = context! {
            categories => categories,
            ingredients => &request.ingredients,
            method => request.method.as_ref().map(|m| m.as_str()),
        };

        let system = self.render_one("system", &ctx)?;
        let user = self.render_one("request", &ctx)?;
        Ok(RenderedPrompt {
            system: system.trim().to_owned(),
            user: user.trim().to_owned(),
        })
    }

    fn render_one(&self, name: &str, ctx: &minijinja::Value) -> Result<String, OracleError> {
        self.env
            .get_template(name)
            .map_err(|e| OracleError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| OracleError::Template(format!("{name} render failed: {e}")))
    }
}

fn add(env: &mut Environment<'static>, name: &'static str, source: String) -> Result<(), OracleError> {
    env.add_template_owned(name, source)
        .map_err(|e| OracleError::Template(format!("failed to add {name} template: {e}")))
}
