//! Append-only meeting transcript.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Speaker {
    /// Meeting notices (start banner etc.)
    System,
    /// The human participant, by display name
    Human(String),
    /// A roster persona, by name
    Persona(String),
}

impl Speaker {
    /// Label used when rendering `speaker: text` lines.
    pub fn label(&self) -> &str {
        match self {
            Speaker::System => "system",
            Speaker::Human(name) | Speaker::Persona(name) => name,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Speaker::Human(_))
    }

    pub fn is_persona(&self) -> bool {
        matches!(self, Speaker::Persona(_))
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable line of the meeting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }

    pub fn human(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human(name.into()),
            text: text.into(),
        }
    }

    pub fn persona(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Persona(name.into()),
            text: text.into(),
        }
    }

    /// `speaker: text`, the line format handed to the capability.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker.label(), self.text)
    }
}

/// Ordered record of a meeting. Entries are only ever appended; the whole
/// log is discarded by a session reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry as a `speaker: text` line, chronological.
    pub fn render_lines(&self) -> String {
        self.entries
            .iter()
            .map(TranscriptEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Up to `window` persona entries preceding index `before`, oldest first.
    ///
    /// Human and system entries in between are skipped, not treated as a
    /// boundary.
    pub fn recent_persona_entries(&self, before: usize, window: usize) -> Vec<TranscriptEntry> {
        let end = before.min(self.entries.len());
        let mut recent: Vec<TranscriptEntry> = self.entries[..end]
            .iter()
            .rev()
            .filter(|entry| entry.speaker.is_persona())
            .take(window)
            .cloned()
            .collect();
        recent.reverse();
        recent
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
