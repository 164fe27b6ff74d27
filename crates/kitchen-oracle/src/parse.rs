//! LLM response parsing into a [`CandidateIngredient`].
//!
//! Structured-output modes make clean JSON the norm, but models still wrap
//! answers in markdown fences or leave trailing commas. Parsing tries a
//! few recovery strategies and then validates the fields: a name, a glyph,
//! and one of the fixed categories (common synonyms are mapped).

use std::str::FromStr;

use kitchen_types::{CandidateIngredient, Category};

use crate::error::OracleError;

/// Longest accepted name, in characters.
pub const MAX_NAME_CHARS: usize = 60;

/// The model's raw answer before validation.
#[derive(Debug, serde::Deserialize)]
struct RawCandidate {
    #[serde(default)]
    name: String,
    #[serde(default, alias = "emoji", alias = "icon")]
    glyph: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
}

/// Parse and validate a model answer.
///
/// Tries, in order:
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Code block, then strip trailing commas
///
/// # Errors
///
/// Returns [`OracleError::Parse`] if no strategy yields JSON of the right
/// shape or if the fields fail validation.
pub fn parse_candidate(raw: &str) -> Result<CandidateIngredient, OracleError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<RawCandidate>(trimmed) {
        return validate(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<RawCandidate>(json_str)
    {
        return validate(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<RawCandidate>(&cleaned) {
        return validate(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<RawCandidate>(&cleaned_inner) {
            return validate(parsed);
        }
    }

    Err(OracleError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

/// Check required fields and normalize whitespace.
fn validate(raw: RawCandidate) -> Result<CandidateIngredient, OracleError> {
    let name = raw.name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(OracleError::Parse(String::from("candidate has no name")));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(OracleError::Parse(format!(
            "candidate name longer than {MAX_NAME_CHARS} characters"
        )));
    }

    let glyph = raw
        .glyph
        .split_whitespace()
        .next()
        .map(ToOwned::to_owned)
        .ok_or_else(|| OracleError::Parse(String::from("candidate has no glyph")))?;

    let category = parse_category(&raw.category)?;

    Ok(CandidateIngredient {
        name,
        glyph,
        description: raw.description.trim().to_owned(),
        category,
    })
}

/// Parse a category name, accepting the synonyms models tend to use.
fn parse_category(s: &str) -> Result<Category, OracleError> {
    if let Ok(category) = Category::from_str(s) {
        return Ok(category);
    }

    match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
        "staple" | "pantry" | "spice" | "seasoning" => Ok(Category::Basic),
        "cereal" | "grains" => Ok(Category::Grain),
        "milk" | "cheese" | "dairy_product" => Ok(Category::Dairy),
        "fruit" | "vegetable" | "veggie" | "vegetables" | "fruits" => Ok(Category::Produce),
        "meat" | "fish" | "seafood" | "egg" | "eggs" => Ok(Category::Protein),
        "batter" => Ok(Category::Dough),
        "baked_good" | "baked_goods" | "breads" => Ok(Category::Bread),
        "pastries" | "pie" | "tart" => Ok(Category::Pastry),
        "condiment" | "dressing" | "dip" => Ok(Category::Sauce),
        "stew" | "broth" | "soups" => Ok(Category::Soup),
        "sweet" | "sweets" | "cake" | "candy" | "desserts" => Ok(Category::Dessert),
        "beverage" | "drinks" | "juice" | "smoothie" => Ok(Category::Drink),
        "meal" | "main" | "main_course" | "entree" | "side" | "snack" | "food" => {
            Ok(Category::Dish)
        }
        other => Err(OracleError::Parse(format!("unknown category: {other}"))),
    }
}

/// Extract the body of the first fenced code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let fence = text.find("```")?;
    let after_fence = fence.checked_add(3)?;
    let rest = text.get(after_fence..)?;
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body_start = rest.find('\n').and_then(|nl| nl.checked_add(1)).unwrap_or(0);
    let body = rest.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// Strip trailing commas before closing braces and brackets.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ',' {
            let mut pending = String::new();
            while let Some(&next) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                pending.push(next);
                chars.next();
            }
            if !matches!(chars.peek(), Some('}' | ']')) {
                result.push(',');
            }
            result.push_str(&pending);
            continue;
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_clean_json() {
        let raw = r#"{"name": "Apple Fritter", "glyph": "🍩", "description": "Fried apple dough.", "category": "pastry"}"#;
        let candidate = parse_candidate(raw).unwrap();
        assert_eq!(candidate.name, "Apple Fritter");
        assert_eq!(candidate.glyph, "🍩");
        assert_eq!(candidate.category, Category::Pastry);
    }

    #[test]
    fn parse_from_codeblock() {
        let raw = "Here you go:\n\n```json\n{\"name\": \"Egg Nog\", \"glyph\": \"🥛\", \"description\": \"Festive.\", \"category\": \"Drink\"}\n```\nEnjoy!";
        let candidate = parse_candidate(raw).unwrap();
        assert_eq!(candidate.name, "Egg Nog");
        assert_eq!(candidate.category, Category::Drink);
    }

    #[test]
    fn parse_trailing_comma() {
        let raw = r#"{"name": "Hash Brown", "glyph": "🥔", "description": "Crispy.", "category": "dish",}"#;
        assert_eq!(parse_candidate(raw).unwrap().name, "Hash Brown");
    }

    #[test]
    fn parse_codeblock_with_trailing_comma() {
        let raw = "```\n{\"name\": \"Jam\", \"emoji\": \"🍓\", \"category\": \"condiment\",}\n```";
        let candidate = parse_candidate(raw).unwrap();
        assert_eq!(candidate.glyph, "🍓");
        assert_eq!(candidate.category, Category::Sauce);
        assert_eq!(candidate.description, "");
    }

    #[test]
    fn category_synonyms_are_mapped() {
        assert_eq!(parse_category("Beverage").unwrap(), Category::Drink);
        assert_eq!(parse_category("main course").unwrap(), Category::Dish);
        assert_eq!(parse_category("baked-goods").unwrap(), Category::Bread);
        assert!(parse_category("mineral").is_err());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let no_name = r#"{"name": "  ", "glyph": "🍲", "category": "soup"}"#;
        assert!(parse_candidate(no_name).is_err());
        let no_glyph = r#"{"name": "Stew", "category": "soup"}"#;
        assert!(parse_candidate(no_glyph).is_err());
        let bad_category = r#"{"name": "Stew", "glyph": "🍲", "category": "vibes"}"#;
        assert!(parse_candidate(bad_category).is_err());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "Very ".repeat(20);
        let raw = serde_json::json!({"name": name, "glyph": "🍲", "category": "soup"}).to_string();
        assert!(parse_candidate(&raw).is_err());
    }

    #[test]
    fn whitespace_is_normalized() {
        let raw = r#"{"name": "  Tomato\n  Jam ", "glyph": " 🍅 🍓", "category": "sauce"}"#;
        let candidate = parse_candidate(raw).unwrap();
        assert_eq!(candidate.name, "Tomato Jam");
        assert_eq!(candidate.glyph, "🍅");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_candidate("I think you made soup.").is_err());
        assert!(parse_candidate("").is_err());
    }

    #[test]
    fn strip_trailing_commas_keeps_inner_commas() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": 2,}"#), r#"{"a": 1, "b": 2}"#);
        assert_eq!(strip_trailing_commas("[1, 2, 3,\n]"), "[1, 2, 3\n]");
    }

    #[test]
    fn extract_plain_and_tagged_fences() {
        assert_eq!(extract_json_from_codeblock("```json\n{\"k\": 1}\n```"), Some("{\"k\": 1}"));
        assert_eq!(extract_json_from_codeblock("```\n{\"k\": 1}\n```"), Some("{\"k\": 1}"));
        assert_eq!(extract_json_from_codeblock("no fence"), None);
    }
}
