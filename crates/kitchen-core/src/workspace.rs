//! The mixing bowl: the ephemeral selection the player builds up by
//! dropping ingredients and methods.

use kitchen_types::{Draggable, IngredientId, MethodId, Selection};
use serde::Serialize;

/// Most ingredients a single selection may hold.
pub const MAX_SELECTION: usize = 3;

/// Why a drop was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The ingredient is already in the bowl.
    Duplicate,
    /// No ingredient or method has this id.
    Unknown,
    /// The ingredient exists but has not been discovered.
    Undiscovered,
    /// A generation request is outstanding; the bowl is locked.
    Busy,
}

/// What a drop did to the bowl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "detail", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    /// The ingredient was appended.
    Added(IngredientId),
    /// The active method changed; `None` means back to plain mixing.
    MethodSelected(Option<MethodId>),
    /// The ingredient was taken out again.
    Removed(IngredientId),
    /// Too many ingredients; the bowl was emptied.
    Overflow,
    /// Nothing changed.
    Rejected(RejectReason),
}

/// The current selection plus the rules for editing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    selection: Selection,
}

impl Workspace {
    /// An empty bowl with no method.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether nothing has been dropped.
    pub fn is_empty(&self) -> bool {
        self.selection.ingredients.is_empty() && self.selection.method.is_none()
    }

    /// Apply a drop.
    ///
    /// Ingredients append in drop order; the fourth one empties the bowl.
    /// Methods replace the active method. Dropping the default method, or
    /// the already-active one, goes back to plain mixing.
    pub fn drop_item(&mut self, item: Draggable) -> WorkspaceEvent {
        match item {
            Draggable::Ingredient(id) => self.add_ingredient(id),
            Draggable::Method(id) => self.select_method(id),
        }
    }

    fn add_ingredient(&mut self, id: IngredientId) -> WorkspaceEvent {
        if self.selection.ingredients.contains(&id) {
            return WorkspaceEvent::Rejected(RejectReason::Duplicate);
        }
        if self.selection.ingredients.len() >= MAX_SELECTION {
            self.clear();
            return WorkspaceEvent::Overflow;
        }
        self.selection.ingredients.push(id.clone());
        WorkspaceEvent::Added(id)
    }

    fn select_method(&mut self, id: MethodId) -> WorkspaceEvent {
        let toggled_off = self.selection.method.as_ref() == Some(&id);
        self.selection.method = if id.is_default() || toggled_off {
            None
        } else {
            Some(id)
        };
        WorkspaceEvent::MethodSelected(self.selection.method.clone())
    }

    /// Take one ingredient back out.
    pub fn remove(&mut self, id: &IngredientId) -> WorkspaceEvent {
        let before = self.selection.ingredients.len();
        self.selection.ingredients.retain(|i| i != id);
        if self.selection.ingredients.len() == before {
            WorkspaceEvent::Rejected(RejectReason::Unknown)
        } else {
            WorkspaceEvent::Removed(id.clone())
        }
    }

    /// Empty the bowl and drop the method.
    pub fn clear(&mut self) {
        self.selection = Selection::default();
    }
}
