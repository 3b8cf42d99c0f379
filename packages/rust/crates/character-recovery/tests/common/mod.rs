//! Shared test helpers for character-recovery.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use character_recovery::{KeyValueStore, MemoryKeyValueStore};
use serde_json::{Value, json};

/// In-memory store that counts writes per key.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryKeyValueStore,
    writes: Mutex<HashMap<String, usize>>,
}

impl RecordingStore {
    pub fn writes(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

impl KeyValueStore for RecordingStore {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        *self.writes.lock().unwrap().entry(key.to_string()).or_default() += 1;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

/// Store where every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        bail!("storage unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        bail!("storage unavailable")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        bail!("storage unavailable")
    }
}

/// A draft that satisfies the full character schema.
pub fn valid_character() -> Value {
    json!({
        "name": "Aragorn",
        "race": "human",
        "classes": [{ "class": "ranger", "level": 5 }],
        "abilityScores": {
            "strength": 16,
            "dexterity": 14,
            "constitution": 14,
            "intelligence": 10,
            "wisdom": 13,
            "charisma": 12
        },
        "hitPoints": { "maximum": 44, "current": 44, "temporary": 0 },
        "armorClass": 15
    })
}

/// A small partial draft.
pub fn partial_draft(name: &str) -> Value {
    json!({
        "name": name,
        "race": "elf",
        "abilityScores": { "strength": 10, "dexterity": 15 }
    })
}
