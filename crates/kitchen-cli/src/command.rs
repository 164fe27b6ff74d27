//! Parsing of play-session input lines into [`Command`]s.

use std::path::PathBuf;
use std::str::FromStr;

use kitchen_core::RecipeDraft;
use kitchen_types::{Category, CustomRecipeId, IngredientId, MethodId, UnknownCategory};

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  add <ingredient>            put an ingredient in the bowl
  remove <ingredient>         take it back out
  method <method>             choose a cooking method (`mix` for none)
  mix                         resolve the bowl
  clear                       empty the bowl
  list                        show discovered ingredients and the bowl
  achievements                show achievements
  recipes                     show custom recipes
  custom add <name> <glyph> <category> <id> <id> [<id>]
                              author a custom recipe (`_` in the name is a space)
  custom delete <recipe-id>   delete a custom recipe
  custom clear                delete every custom recipe
  export <path>               write custom recipes to a JSON file
  import <path>               read custom recipes from a JSON file
  reset                       wipe all progress
  help                        show this text
  quit                        save and exit";

/// One play-session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Drop an ingredient into the bowl.
    Add(IngredientId),
    /// Take an ingredient out of the bowl.
    Remove(IngredientId),
    /// Select a cooking method.
    Method(MethodId),
    /// Resolve the bowl.
    Mix,
    /// Empty the bowl.
    Clear,
    /// Show the collection and the bowl.
    List,
    /// Show achievements.
    Achievements,
    /// Show the custom-recipe ledger.
    Recipes,
    /// Author a custom recipe.
    CustomAdd(RecipeDraft),
    /// Delete one custom recipe.
    CustomDelete(CustomRecipeId),
    /// Delete every custom recipe.
    CustomClear,
    /// Export the ledger to a file.
    Export(PathBuf),
    /// Import a ledger file.
    Import(PathBuf),
    /// Wipe all progress.
    Reset,
    /// Print usage.
    Help,
    /// Save and leave.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// Arguments are missing or extra.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// The category argument is not a known category.
    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        match (head.to_lowercase().as_str(), args) {
            ("add", [id]) => Ok(Self::Add(IngredientId::from(*id))),
            ("add", _) => Err(CommandError::Usage("add <ingredient>")),
            ("remove", [id]) => Ok(Self::Remove(IngredientId::from(*id))),
            ("remove", _) => Err(CommandError::Usage("remove <ingredient>")),
            ("method", [id]) => Ok(Self::Method(MethodId::from(*id))),
            ("method", _) => Err(CommandError::Usage("method <method>")),
            ("mix", []) => Ok(Self::Mix),
            ("clear", []) => Ok(Self::Clear),
            ("list", []) => Ok(Self::List),
            ("achievements", []) => Ok(Self::Achievements),
            ("recipes", []) => Ok(Self::Recipes),
            ("custom", rest) => parse_custom(rest),
            ("export", [path]) => Ok(Self::Export(PathBuf::from(*path))),
            ("export", _) => Err(CommandError::Usage("export <path>")),
            ("import", [path]) => Ok(Self::Import(PathBuf::from(*path))),
            ("import", _) => Err(CommandError::Usage("import <path>")),
            ("reset", []) => Ok(Self::Reset),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            ("mix" | "clear" | "list" | "achievements" | "recipes" | "reset" | "quit" | "exit", _) => {
                Err(CommandError::Usage("this command takes no arguments"))
            }
            (other, _) => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

const CUSTOM_ADD_USAGE: &str = "custom add <name> <glyph> <category> <id> <id> [<id>]";

fn parse_custom(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        ["add", name, glyph, category, inputs @ ..] if (2..=3).contains(&inputs.len()) => {
            Ok(Command::CustomAdd(RecipeDraft {
                name: name.replace('_', " "),
                glyph: (*glyph).to_owned(),
                category: Category::from_str(category)?,
                description: String::new(),
                ingredients: inputs.iter().map(|id| IngredientId::from(*id)).collect(),
            }))
        }
        ["add", ..] => Err(CommandError::Usage(CUSTOM_ADD_USAGE)),
        ["delete", id] => Ok(Command::CustomDelete(CustomRecipeId::from(*id))),
        ["clear"] => Ok(Command::CustomClear),
        _ => Err(CommandError::Usage(
            "custom add ... | custom delete <recipe-id> | custom clear",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("mix").unwrap(), Command::Mix);
        assert_eq!(parse("  MIX  ").unwrap(), Command::Mix);
        assert_eq!(parse("add flour").unwrap(), Command::Add(IngredientId::from("flour")));
        assert_eq!(parse("method bake").unwrap(), Command::Method(MethodId::from("bake")));
        assert_eq!(parse("exit").unwrap(), Command::Quit);
        assert_eq!(
            parse("export recipes.json").unwrap(),
            Command::Export(PathBuf::from("recipes.json"))
        );
    }

    #[test]
    fn custom_add_builds_a_draft() {
        let Command::CustomAdd(draft) = parse("custom add Fries_Deluxe 🍟 dish potato salt").unwrap()
        else {
            panic!("expected a custom add");
        };
        assert_eq!(draft.name, "Fries Deluxe");
        assert_eq!(draft.category, Category::Dish);
        assert_eq!(draft.ingredients.len(), 2);
    }

    #[test]
    fn custom_add_checks_arity_and_category() {
        assert_eq!(
            parse("custom add Chips 🍟 dish potato"),
            Err(CommandError::Usage(CUSTOM_ADD_USAGE))
        );
        assert_eq!(
            parse("custom add Chips 🍟 dish a b c d"),
            Err(CommandError::Usage(CUSTOM_ADD_USAGE))
        );
        assert!(matches!(
            parse("custom add Chips 🍟 snackfood potato salt"),
            Err(CommandError::Category(_))
        ));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert!(matches!(parse("bake bread"), Err(CommandError::Unknown(_))));
        assert!(matches!(parse("add"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("mix now"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("custom"), Err(CommandError::Usage(_))));
    }
}
