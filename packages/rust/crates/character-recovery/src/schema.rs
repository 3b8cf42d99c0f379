//! Character sheet schema and the validator seam.
//!
//! Follows project Schema Singularity: the Rust types are the source of truth,
//! the JSON Schema is generated from them and drafts are checked against it
//! before being parsed.

use jsonschema::JSONSchema;
use jsonschema::error::ValidationErrorKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecoveryError;

/// Structural kind of a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldErrorKind {
    /// Number, string length or list length below the allowed minimum.
    BelowMinimum,
    /// Number, string length or list length above the allowed maximum.
    AboveMaximum,
    /// Value has the wrong JSON type, or is missing.
    WrongType,
    /// Value is not one of the allowed options.
    NotAllowedValue,
    /// Any other failure.
    Other,
}

/// One failure reported by a [`DraftValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Dotted path of the offending field (`abilityScores.strength`, `classes.0.level`).
    pub field_path: String,
    /// Validator message.
    pub message: String,
    /// Failure kind.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Build a field error.
    #[must_use]
    pub fn new(
        field_path: impl Into<String>,
        message: impl Into<String>,
        kind: FieldErrorKind,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Schema check for character drafts.
///
/// Returns the parsed (normalized) character on success, or every field
/// failure on rejection.
pub trait DraftValidator: Send + Sync {
    /// Validate `draft`.
    ///
    /// # Errors
    ///
    /// Returns the list of field failures when `draft` is rejected.
    fn validate(&self, draft: &Value) -> Result<Value, Vec<FieldError>>;
}

impl<F> DraftValidator for F
where
    F: Fn(&Value) -> Result<Value, Vec<FieldError>> + Send + Sync,
{
    fn validate(&self, draft: &Value) -> Result<Value, Vec<FieldError>> {
        self(draft)
    }
}

// Variant and field docs would surface in the generated schema, so the
// schema types below stay undocumented.

/// Playable races.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Halfling,
    Dragonborn,
    Gnome,
    HalfElf,
    HalfOrc,
    Tiefling,
}

/// Character classes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Artificer,
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// One class entry of a (possibly multiclassed) character.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassLevel {
    pub class: CharacterClass,
    #[schemars(range(min = 1, max = 20))]
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
}

/// The six ability scores.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AbilityScores {
    #[schemars(range(min = 1, max = 30))]
    pub strength: i32,
    #[schemars(range(min = 1, max = 30))]
    pub dexterity: i32,
    #[schemars(range(min = 1, max = 30))]
    pub constitution: i32,
    #[schemars(range(min = 1, max = 30))]
    pub intelligence: i32,
    #[schemars(range(min = 1, max = 30))]
    pub wisdom: i32,
    #[schemars(range(min = 1, max = 30))]
    pub charisma: i32,
}

/// Maximum, current and temporary hit points.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HitPoints {
    #[schemars(range(min = 1))]
    pub maximum: i32,
    pub current: i32,
    #[serde(default)]
    pub temporary: i32,
}

/// A complete, schema-valid character.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    #[schemars(length(min = 1, max = 100))]
    pub name: String,
    pub race: Race,
    #[schemars(length(min = 1))]
    pub classes: Vec<ClassLevel>,
    pub ability_scores: AbilityScores,
    pub hit_points: HitPoints,
    #[schemars(range(min = 1))]
    pub armor_class: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CharacterSheet {
    /// JSON Schema generated from this type.
    #[must_use]
    pub fn json_schema() -> Value {
        serde_json::to_value(schemars::schema_for!(CharacterSheet)).unwrap_or(Value::Null)
    }
}

/// [`DraftValidator`] backed by the generated [`CharacterSheet`] schema.
pub struct CharacterSchemaValidator {
    compiled: JSONSchema,
}

impl std::fmt::Debug for CharacterSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterSchemaValidator").finish_non_exhaustive()
    }
}

impl CharacterSchemaValidator {
    /// Compile the character schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::Schema`] if the generated schema does not compile.
    pub fn new() -> Result<Self, RecoveryError> {
        let schema = CharacterSheet::json_schema();
        let compiled = JSONSchema::compile(&schema)
            .map_err(|err| RecoveryError::Schema(err.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate and parse `draft` into a typed sheet.
    ///
    /// # Errors
    ///
    /// Returns every schema failure when `draft` is rejected.
    pub fn parse(&self, draft: &Value) -> Result<CharacterSheet, Vec<FieldError>> {
        if let Err(failures) = self.compiled.validate(draft) {
            let errors = failures
                .map(|failure| {
                    let kind = classify_kind(&failure.kind);
                    let mut field_path = pointer_to_dotted(&failure.instance_path.to_string());
                    if let ValidationErrorKind::Required { property } = &failure.kind {
                        let property = property
                            .as_str()
                            .map_or_else(|| property.to_string(), str::to_string);
                        field_path = if field_path.is_empty() {
                            property
                        } else {
                            format!("{field_path}.{property}")
                        };
                    }
                    FieldError::new(field_path, failure.to_string(), kind)
                })
                .collect();
            return Err(errors);
        }
        serde_json::from_value(draft.clone())
            .map_err(|err| vec![FieldError::new("", err.to_string(), FieldErrorKind::Other)])
    }
}

impl DraftValidator for CharacterSchemaValidator {
    fn validate(&self, draft: &Value) -> Result<Value, Vec<FieldError>> {
        let sheet = self.parse(draft)?;
        serde_json::to_value(sheet)
            .map_err(|err| vec![FieldError::new("", err.to_string(), FieldErrorKind::Other)])
    }
}

fn classify_kind(kind: &ValidationErrorKind) -> FieldErrorKind {
    match kind {
        ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. }
        | ValidationErrorKind::MinLength { .. }
        | ValidationErrorKind::MinItems { .. } => FieldErrorKind::BelowMinimum,
        ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. }
        | ValidationErrorKind::MaxLength { .. }
        | ValidationErrorKind::MaxItems { .. } => FieldErrorKind::AboveMaximum,
        ValidationErrorKind::Type { .. } | ValidationErrorKind::Required { .. } => {
            FieldErrorKind::WrongType
        }
        ValidationErrorKind::Enum { .. } => FieldErrorKind::NotAllowedValue,
        _ => FieldErrorKind::Other,
    }
}

/// `/classes/0/level` -> `classes.0.level`.
fn pointer_to_dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
