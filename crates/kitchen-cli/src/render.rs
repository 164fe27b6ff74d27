//! Plain-text rendering of engine state and outcomes.
//!
//! The engine hands back message codes, never prose; this is where a
//! code becomes a line of text.

use std::fmt::Write as _;

use kitchen_catalog::Catalog;
use kitchen_core::{ImportSummary, PlayerState, Progress, RejectReason, Workspace, WorkspaceEvent};
use kitchen_types::{CustomRecipe, MessageCode, Resolution};

/// Short text for a message code.
pub const fn message(code: MessageCode) -> &'static str {
    match code {
        MessageCode::NewDiscovery => "New discovery!",
        MessageCode::AlreadyDiscovered => "You already know this one.",
        MessageCode::NoEffect => "That method does nothing to it.",
        MessageCode::NoRecipeFound => "Nothing came of it.",
        MessageCode::EmptySelection => "The bowl is empty.",
        MessageCode::Overflow => "Too many ingredients. The bowl was emptied.",
        MessageCode::UnknownIngredient => "You don't have one of those.",
        MessageCode::RepeatedIngredient => "Each ingredient can only go in once.",
        MessageCode::Busy => "Still cooking, wait for the last attempt.",
        MessageCode::Stale => "A late result was thrown away.",
    }
}

/// Describe a resolution outcome.
pub fn resolution(resolution: &Resolution) -> String {
    let Some(found) = resolution.discovery() else {
        return message(resolution.message()).to_owned();
    };

    let mut out = String::new();
    if let Some(intermediate) = &found.intermediate {
        let _ = write!(out, "{} {} -> ", intermediate.glyph, intermediate.name);
    }
    let _ = write!(
        out,
        "{} {}  {}",
        found.result.glyph,
        found.result.name,
        message(found.message)
    );
    if let Some(description) = found.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n  {description}");
    }
    for achievement in &found.unlocked_achievements {
        let _ = write!(out, "\n  Achievement unlocked: {achievement}");
    }
    out
}

/// Describe what a drop did to the bowl.
pub fn workspace_event(event: &WorkspaceEvent) -> String {
    match event {
        WorkspaceEvent::Added(id) => format!("added {id}"),
        WorkspaceEvent::Removed(id) => format!("removed {id}"),
        WorkspaceEvent::MethodSelected(Some(method)) => format!("method: {method}"),
        WorkspaceEvent::MethodSelected(None) => String::from("method: mix"),
        WorkspaceEvent::Overflow => message(MessageCode::Overflow).to_owned(),
        WorkspaceEvent::Rejected(reason) => match reason {
            RejectReason::Duplicate => String::from("That is already in the bowl."),
            RejectReason::Unknown => String::from("No such ingredient or method."),
            RejectReason::Undiscovered => String::from("You haven't discovered that yet."),
            RejectReason::Busy => message(MessageCode::Busy).to_owned(),
        },
    }
}

/// The bowl on one line.
pub fn bowl(workspace: &Workspace, state: &PlayerState) -> String {
    let selection = workspace.selection();
    if selection.ingredients.is_empty() {
        return String::from("bowl: (empty)");
    }
    let items: Vec<String> = selection
        .ingredients
        .iter()
        .map(|id| match state.ingredient(id.as_str()) {
            Some(found) => format!("{} {}", found.glyph, found.name),
            None => id.to_string(),
        })
        .collect();
    let method = selection
        .active_method()
        .map_or_else(|| String::from("mix"), ToString::to_string);
    format!("bowl: {} [{method}]", items.join(" + "))
}

/// The discovered collection, the available methods, and the bowl.
pub fn collection(
    state: &PlayerState,
    catalog: &Catalog,
    workspace: &Workspace,
    progress: Progress,
) -> String {
    let mut out = format!(
        "discovered {}/{} (achievements {}/{})",
        progress.discovered, progress.total, progress.achievements_earned, progress.achievements_total
    );
    for ingredient in state.discovered() {
        let _ = write!(
            out,
            "\n  {} {:<24} {}",
            ingredient.glyph,
            ingredient.id.as_str(),
            ingredient.category
        );
    }
    let methods: Vec<String> = catalog
        .methods()
        .iter()
        .map(|m| format!("{} {}", m.glyph, m.id))
        .collect();
    let _ = write!(out, "\nmethods: {}", methods.join(", "));
    let _ = write!(out, "\n{}", bowl(workspace, state));
    out
}

/// Every achievement with its status.
pub fn achievements(state: &PlayerState) -> String {
    let lines: Vec<String> = state
        .achievements
        .iter()
        .map(|a| {
            let mark = if a.achieved { "x" } else { " " };
            format!("[{mark}] {}: {}", a.name, a.description)
        })
        .collect();
    if lines.is_empty() {
        return String::from("no achievements configured");
    }
    lines.join("\n")
}

/// The custom-recipe ledger.
pub fn recipes(entries: &[CustomRecipe]) -> String {
    if entries.is_empty() {
        return String::from("no custom recipes");
    }
    entries
        .iter()
        .map(|r| {
            let inputs: Vec<&str> = r.ingredients.iter().map(|i| i.as_str()).collect();
            format!(
                "{}  {} = {} {} ({})",
                r.id,
                inputs.join(" + "),
                r.result.glyph,
                r.result.name,
                r.result.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of an import.
pub fn import_summary(summary: ImportSummary) -> String {
    format!(
        "imported {} recipe(s), skipped {} already present",
        summary.imported, summary.skipped
    )
}
