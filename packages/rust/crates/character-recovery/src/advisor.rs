//! Schema-independent completeness hints for character drafts.

use serde_json::Value;

use crate::draft::is_present;

const ADD_NAME: &str = "Add a character name to identify your character";
const SELECT_RACE: &str = "Select a character race to define racial traits";
const CHOOSE_CLASS: &str = "Choose at least one character class to define abilities";
const SET_ABILITY_SCORES: &str =
    "Set ability scores using point buy, standard array, or rolled stats";
const RAISE_LOW_SCORES: &str =
    "Ability scores should be at least 1 (consider 8 as practical minimum)";
const ADD_HIGH_SCORE: &str =
    "Consider having at least one ability score above 10 for character effectiveness";
const SET_HIT_POINTS: &str =
    "Set maximum hit points based on class hit die and Constitution modifier";
const SET_ARMOR_CLASS: &str =
    "Set armor class based on armor worn and Dexterity modifier (minimum 10 + Dex modifier)";

/// Every suggestion that applies to `draft`, in a fixed order.
///
/// Works on incomplete or invalid drafts; nothing here consults the schema.
#[must_use]
pub fn generate_recovery_suggestions(draft: &Value) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !is_present(draft.get("name")) {
        suggestions.push(ADD_NAME);
    }
    if !is_present(draft.get("race")) {
        suggestions.push(SELECT_RACE);
    }
    let has_class = draft
        .get("classes")
        .and_then(Value::as_array)
        .is_some_and(|classes| !classes.is_empty());
    if !has_class {
        suggestions.push(CHOOSE_CLASS);
    }

    let ability_scores = draft.get("abilityScores");
    if is_present(ability_scores) {
        let scores: Vec<&Value> = match ability_scores {
            Some(Value::Object(map)) => map.values().collect(),
            Some(Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        };
        if scores.iter().any(|score| loose_number(score).is_some_and(|n| n < 1.0)) {
            suggestions.push(RAISE_LOW_SCORES);
        }
        // Unparseable scores are never "at most 10".
        if scores.iter().all(|score| loose_number(score).is_some_and(|n| n <= 10.0)) {
            suggestions.push(ADD_HIGH_SCORE);
        }
    } else {
        suggestions.push(SET_ABILITY_SCORES);
    }

    let hit_points = draft.get("hitPoints");
    let low_maximum = hit_points
        .and_then(|hp| hp.get("maximum"))
        .and_then(loose_number)
        .is_some_and(|maximum| maximum < 1.0);
    if !is_present(hit_points) || low_maximum {
        suggestions.push(SET_HIT_POINTS);
    }

    let armor_class = draft.get("armorClass");
    let low_armor = armor_class
        .and_then(loose_number)
        .is_some_and(|ac| ac < 10.0);
    if !is_present(armor_class) || low_armor {
        suggestions.push(SET_ARMOR_CLASS);
    }

    suggestions.into_iter().map(str::to_string).collect()
}

/// Numeric reading of a form value: `null` is 0, numeric strings are parsed.
///
/// Objects, arrays and text that is not a number have no reading.
fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                Some(0.0)
            } else {
                text.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}
