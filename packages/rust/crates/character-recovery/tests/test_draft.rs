//! Draft tree helper tests.

use character_recovery::{
    has_populated_fields, is_present, looks_restorable, set_path, structural_clone,
};
use serde_json::{Value, json};

#[test]
fn test_structural_clone_is_independent_and_order_stable() {
    let original = json!({ "z": 1, "a": { "y": [1, { "k": "v" }], "b": null } });

    let mut copy = structural_clone(&original);
    assert_eq!(copy, original);
    assert_eq!(
        serde_json::to_string(&copy).unwrap(),
        serde_json::to_string(&structural_clone(&original)).unwrap()
    );

    copy["a"]["y"][1]["k"] = json!("changed");
    assert_eq!(original["a"]["y"][1]["k"], json!("v"));
}

#[test]
fn test_set_path_creates_missing_objects() {
    let mut draft = json!({});

    assert!(set_path(&mut draft, "abilityScores.strength", json!(8)));
    assert!(set_path(&mut draft, "hitPoints", json!({ "maximum": 10 })));

    assert_eq!(
        draft,
        json!({ "abilityScores": { "strength": 8 }, "hitPoints": { "maximum": 10 } })
    );
}

#[test]
fn test_set_path_replaces_null_intermediates() {
    let mut draft = json!({ "abilityScores": null });

    assert!(set_path(&mut draft, "abilityScores.wisdom", json!(20)));
    assert_eq!(draft["abilityScores"]["wisdom"], json!(20));
}

#[test]
fn test_set_path_walks_array_indices() {
    let mut draft = json!({ "classes": [{ "class": "bard", "level": "x" }] });

    assert!(set_path(&mut draft, "classes.0.level", json!(1)));
    assert_eq!(draft["classes"][0]["level"], json!(1));

    assert!(!set_path(&mut draft, "classes.3.level", json!(1)));
    assert!(!set_path(&mut draft, "classes.first.level", json!(1)));
    assert_eq!(draft["classes"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_set_path_skips_scalar_intermediates() {
    let mut draft = json!({ "name": "Bilbo" });
    let before = draft.clone();

    assert!(!set_path(&mut draft, "name.first", json!("x")));
    assert!(!set_path(&mut draft, "", json!("x")));
    assert!(!set_path(&mut draft, "a..b", json!("x")));
    assert_eq!(draft, before);

    let mut scalar = json!(5);
    assert!(!set_path(&mut scalar, "a", json!(1)));
}

#[test]
fn test_presence_heuristics() {
    assert!(!is_present(None));
    assert!(!is_present(Some(&Value::Null)));
    assert!(!is_present(Some(&json!(""))));
    assert!(!is_present(Some(&json!(0))));
    assert!(!is_present(Some(&json!(false))));
    assert!(is_present(Some(&json!([]))));
    assert!(is_present(Some(&json!({}))));
    assert!(is_present(Some(&json!("x"))));

    assert!(looks_restorable(&json!({ "classes": [] })));
    assert!(looks_restorable(&json!({ "abilityScores": {} })));
    assert!(!looks_restorable(&json!({ "name": "", "race": null })));
    assert!(!looks_restorable(&json!("just text")));

    assert!(has_populated_fields(&json!({ "notes": null })));
    assert!(!has_populated_fields(&json!({})));
    assert!(!has_populated_fields(&json!([1])));
}
