//! Validation with recovery guidance.
//!
//! Runs a [`DraftValidator`], classifies each failure through a fixed rule
//! table into user-actionable or auto-fixable errors, and assembles a
//! corrected draft from the auto-fix values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::{set_path, structural_clone};
use crate::error::RecoveryError;
use crate::schema::{CharacterSchemaValidator, DraftValidator, FieldError, FieldErrorKind};

/// Fallback remediation for failures no rule matches.
pub const GENERIC_FIX: &str = "Please check the value and try again";

/// A validation failure with remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorWithFix {
    /// Validator message.
    pub message: String,
    /// Dotted path of the offending field.
    pub field_path: String,
    /// Human-readable remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    /// Whether [`auto_fix_value`](Self::auto_fix_value) resolves this error.
    #[serde(default)]
    pub auto_fixable: bool,
    /// Replacement value; set only when `auto_fixable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix_value: Option<Value>,
}

/// Outcome of [`RecoveryEngine::validate_with_recovery`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryReport {
    /// Whether the validator accepted the draft.
    pub is_valid: bool,
    /// One entry per validator failure, in validator order.
    pub errors: Vec<ValidationErrorWithFix>,
    /// `fieldPath -> autoFixValue` for every auto-fixable error.
    pub suggested_fixes: BTreeMap<String, Value>,
    /// Draft with every suggested fix applied; absent when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fixable_data: Option<Value>,
}

impl RecoveryReport {
    fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            suggested_fixes: BTreeMap::new(),
            auto_fixable_data: None,
        }
    }

    /// Errors the user has to resolve by hand.
    pub fn manual_errors(&self) -> impl Iterator<Item = &ValidationErrorWithFix> {
        self.errors.iter().filter(|error| !error.auto_fixable)
    }
}

#[derive(Debug, Clone, Copy)]
enum PathMatch {
    Contains(&'static str),
    Equals(&'static str),
}

impl PathMatch {
    fn matches(self, field_path: &str) -> bool {
        match self {
            Self::Contains(fragment) => field_path.contains(fragment),
            Self::Equals(exact) => field_path == exact,
        }
    }
}

struct FixRule {
    kind: FieldErrorKind,
    path: PathMatch,
    fix: &'static str,
    auto_fix: Option<i64>,
}

// First match wins.
const FIX_RULES: &[FixRule] = &[
    FixRule {
        kind: FieldErrorKind::BelowMinimum,
        path: PathMatch::Contains("name"),
        fix: "Character name must be at least 1 character long",
        auto_fix: None,
    },
    FixRule {
        kind: FieldErrorKind::BelowMinimum,
        path: PathMatch::Contains("abilityScores"),
        fix: "Ability scores must be at least 1. Consider using 8 as minimum.",
        auto_fix: Some(8),
    },
    FixRule {
        kind: FieldErrorKind::BelowMinimum,
        path: PathMatch::Equals("classes"),
        fix: "At least one character class is required",
        auto_fix: None,
    },
    FixRule {
        kind: FieldErrorKind::AboveMaximum,
        path: PathMatch::Contains("name"),
        fix: "Character name must be 100 characters or less",
        auto_fix: None,
    },
    FixRule {
        kind: FieldErrorKind::AboveMaximum,
        path: PathMatch::Contains("abilityScores"),
        fix: "Ability scores cannot exceed 30. Consider using 20 as maximum.",
        auto_fix: Some(20),
    },
    FixRule {
        kind: FieldErrorKind::WrongType,
        path: PathMatch::Contains("level"),
        fix: "Level must be a number between 1 and 20",
        auto_fix: Some(1),
    },
    FixRule {
        kind: FieldErrorKind::NotAllowedValue,
        path: PathMatch::Equals("race"),
        fix: "Please select a valid race from the dropdown list",
        auto_fix: None,
    },
    FixRule {
        kind: FieldErrorKind::NotAllowedValue,
        path: PathMatch::Contains("class"),
        fix: "Please select a valid class from the dropdown list",
        auto_fix: None,
    },
];

/// Attach remediation to a single validator failure.
#[must_use]
pub fn classify_error(error: &FieldError) -> ValidationErrorWithFix {
    let rule = FIX_RULES
        .iter()
        .find(|rule| rule.kind == error.kind && rule.path.matches(&error.field_path));
    let auto_fix_value = rule.and_then(|rule| rule.auto_fix).map(Value::from);

    ValidationErrorWithFix {
        message: error.message.clone(),
        field_path: error.field_path.clone(),
        suggested_fix: Some(rule.map_or(GENERIC_FIX, |rule| rule.fix).to_string()),
        auto_fixable: auto_fix_value.is_some(),
        auto_fix_value,
    }
}

/// Copy of `draft` with every `path -> value` fix assigned.
///
/// Paths blocked by a scalar intermediate are skipped.
#[must_use]
pub fn apply_auto_fixes(draft: &Value, fixes: &BTreeMap<String, Value>) -> Value {
    let mut fixed = structural_clone(draft);
    for (path, value) in fixes {
        if !set_path(&mut fixed, path, value.clone()) {
            log::debug!("skipped auto-fix for {path}: path is not assignable");
        }
    }
    fixed
}

/// Validation-recovery engine over a pluggable validator.
#[derive(Debug)]
pub struct RecoveryEngine<V = CharacterSchemaValidator> {
    validator: V,
}

impl RecoveryEngine<CharacterSchemaValidator> {
    /// Engine over the built-in character schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::Schema`] if the schema does not compile.
    pub fn with_character_schema() -> Result<Self, RecoveryError> {
        Ok(Self::new(CharacterSchemaValidator::new()?))
    }
}

impl<V: DraftValidator> RecoveryEngine<V> {
    /// Engine over `validator`.
    #[must_use]
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Underlying validator.
    #[must_use]
    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Validate `draft` and explain how to repair it.
    ///
    /// Invalid drafts are a normal outcome, never an error.
    #[must_use]
    pub fn validate_with_recovery(&self, draft: &Value) -> RecoveryReport {
        let failures = match self.validator.validate(draft) {
            Ok(_) => return RecoveryReport::valid(),
            Err(failures) => failures,
        };

        let errors: Vec<ValidationErrorWithFix> = failures.iter().map(classify_error).collect();
        let suggested_fixes: BTreeMap<String, Value> = errors
            .iter()
            .filter_map(|error| {
                error
                    .auto_fix_value
                    .clone()
                    .map(|value| (error.field_path.clone(), value))
            })
            .collect();
        let auto_fixable_data =
            (!suggested_fixes.is_empty()).then(|| apply_auto_fixes(draft, &suggested_fixes));

        log::debug!(
            "draft rejected with {} errors ({} auto-fixable)",
            errors.len(),
            suggested_fixes.len()
        );

        RecoveryReport {
            is_valid: false,
            errors,
            suggested_fixes,
            auto_fixable_data,
        }
    }
}
