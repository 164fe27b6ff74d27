//! One player's play session: commands in, text out.
//!
//! The session never waits on the generation service itself. A `mix` that
//! needs generation hands its ticket back to the event loop, which drives
//! the request alongside input and autosave and returns the answer through
//! [`Session::finish`].

use kitchen_core::{BlobStore, GenerationTicket, Generator, Kitchen, ResolutionStep};
use kitchen_types::{CandidateIngredient, Draggable};
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::render;

/// What the event loop should do after a command.
#[derive(Debug)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Send this ticket's request to the generator.
    Generate(GenerationTicket),
    /// Progress was wiped; push back the next autosave.
    Reset,
    /// Leave the loop.
    Quit,
}

/// A play session over one engine.
#[derive(Debug)]
pub struct Session<B, G> {
    kitchen: Kitchen<B, G>,
}

impl<B: BlobStore, G: Generator> Session<B, G> {
    /// Start a session.
    pub const fn new(kitchen: Kitchen<B, G>) -> Self {
        Self { kitchen }
    }

    /// The engine.
    pub const fn kitchen(&self) -> &Kitchen<B, G> {
        &self.kitchen
    }

    /// Run one command, appending output lines to `out`.
    pub async fn execute(&mut self, command: Command, out: &mut Vec<String>) -> Flow {
        match command {
            Command::Add(id) => self.drop_item(Draggable::Ingredient(id), out),
            Command::Method(id) => self.drop_item(Draggable::Method(id), out),
            Command::Remove(id) => {
                let event = self.kitchen.remove_from_workspace(&id);
                out.push(render::workspace_event(&event));
                self.show_bowl(out);
            }
            Command::Mix => return self.mix(out),
            Command::Clear => {
                self.kitchen.clear_workspace();
                self.show_bowl(out);
            }
            Command::List => out.push(render::collection(
                self.kitchen.state(),
                self.kitchen.catalog(),
                self.kitchen.workspace(),
                self.kitchen.progress(),
            )),
            Command::Achievements => out.push(render::achievements(self.kitchen.state())),
            Command::Recipes => out.push(render::recipes(
                self.kitchen.state().custom_recipes.entries(),
            )),
            Command::CustomAdd(draft) => match self.kitchen.add_custom_recipe(draft) {
                Ok(recipe) => out.push(format!(
                    "added custom recipe {} ({} {})",
                    recipe.id, recipe.result.glyph, recipe.result.name
                )),
                Err(e) => out.push(e.to_string()),
            },
            Command::CustomDelete(id) => match self.kitchen.delete_custom_recipe(&id) {
                Ok(recipe) => out.push(format!("deleted custom recipe {}", recipe.id)),
                Err(e) => out.push(e.to_string()),
            },
            Command::CustomClear => {
                let removed = self.kitchen.clear_custom_recipes();
                out.push(format!("deleted {removed} custom recipe(s)"));
            }
            Command::Export(path) => {
                let written = match self.kitchen.export_custom_recipes() {
                    Ok(json) => tokio::fs::write(&path, json).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                match written {
                    Ok(()) => out.push(format!("exported to {}", path.display())),
                    Err(e) => out.push(format!("export failed: {e}")),
                }
            }
            Command::Import(path) => match tokio::fs::read_to_string(&path).await {
                Ok(json) => match self.kitchen.import_custom_recipes(&json) {
                    Ok(summary) => out.push(render::import_summary(summary)),
                    Err(e) => out.push(format!("import rejected: {e}")),
                },
                Err(e) => out.push(format!("cannot read {}: {e}", path.display())),
            },
            Command::Reset => {
                self.kitchen.reset();
                info!("progress reset from the play session");
                out.push(String::from("all progress wiped"));
                return Flow::Reset;
            }
            Command::Help => out.push(HELP.to_owned()),
            Command::Quit => {
                self.kitchen.autosave();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Apply a generation answer and describe the outcome.
    pub fn finish(
        &mut self,
        ticket: GenerationTicket,
        candidate: Option<CandidateIngredient>,
        out: &mut Vec<String>,
    ) {
        let resolution = self.kitchen.complete_generation(ticket, candidate);
        out.push(render::resolution(&resolution));
        if resolution.discovery().is_some() {
            self.show_bowl(out);
        }
    }

    /// The periodic safeguard save.
    pub fn autosave(&mut self) {
        self.kitchen.autosave();
    }

    fn drop_item(&mut self, item: Draggable, out: &mut Vec<String>) {
        let event = self.kitchen.drop_item(item);
        out.push(render::workspace_event(&event));
        self.show_bowl(out);
    }

    fn mix(&mut self, out: &mut Vec<String>) -> Flow {
        match self.kitchen.begin_mix() {
            ResolutionStep::Finished(resolution) => {
                out.push(render::resolution(&resolution));
                if resolution.discovery().is_some() {
                    self.show_bowl(out);
                }
                Flow::Continue
            }
            ResolutionStep::Pending(ticket) => {
                if self.kitchen.workspace().is_empty() {
                    warn!("generation requested for an empty bowl");
                }
                out.push(String::from("cooking something new..."));
                Flow::Generate(ticket)
            }
        }
    }

    fn show_bowl(&self, out: &mut Vec<String>) {
        out.push(render::bowl(self.kitchen.workspace(), self.kitchen.state()));
    }
}
