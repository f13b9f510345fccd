//! Core types for the persona roster.
//!
//! A persona is a scripted meeting participant: a unique display name and a
//! short disposition code that drives its tone. The roster is loaded once
//! and shared read-only by every meeting.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// One scripted meeting participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Persona {
    /// Unique display name, also the stable identifier.
    pub name: String,

    /// Short categorical disposition tag (e.g. a 4-letter code like "ENTP").
    #[serde(alias = "mbti")]
    pub trait_code: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, trait_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trait_code: trait_code.into(),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.trait_code)
    }
}

// ─────────────────────────────────────────────────────────────────
// Roster
// ─────────────────────────────────────────────────────────────────

/// Fixed, ordered set of personas. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    personas: Vec<Persona>,
}

impl Roster {
    /// Build a roster, keeping the first persona for each name.
    pub fn new(personas: Vec<Persona>) -> Self {
        let mut unique: Vec<Persona> = Vec::with_capacity(personas.len());
        for persona in personas {
            if !unique.iter().any(|p| p.name == persona.name) {
                unique.push(persona);
            }
        }
        Self { personas: unique }
    }

    /// Roster with no personas ("no personas" mode).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    /// Persona names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.personas.iter().map(|p| p.name.clone()).collect()
    }

    /// Look up a persona by exact name.
    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
