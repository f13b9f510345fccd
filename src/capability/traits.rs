//! Capability trait definitions
//!
//! Defines the `MeetingCapability` trait: the three text operations the
//! orchestrator needs from an external generative model.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::meeting::TranscriptEntry;
use crate::persona::Persona;

// ─────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────

/// The three capability operations, used for logging and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GenerateResponse,
    ClassifyAddressee,
    Summarize,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GenerateResponse => "generate_response",
            Operation::ClassifyAddressee => "classify_addressee",
            Operation::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────

/// Ask one persona for its next utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRequest {
    /// Who is speaking
    pub persona: Persona,

    /// Meeting topic
    pub topic: String,

    /// Full transcript so far, one `speaker: text` line per entry
    pub transcript: String,
}

/// Ask which single persona, if any, a human line is aimed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddresseeRequest {
    /// The human utterance
    pub utterance: String,

    /// Current roster names
    pub persona_names: Vec<String>,

    /// Recent persona lines preceding the utterance, oldest first
    pub recent_lines: Vec<TranscriptEntry>,
}

/// Ask for the end-of-meeting report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Meeting topic
    pub topic: String,

    /// Transcript without system entries, human lines relabelled
    pub transcript: String,
}

// ─────────────────────────────────────────────────────────────────
// MeetingCapability Trait
// ─────────────────────────────────────────────────────────────────

/// External generative capability used by the turn orchestrator.
///
/// Implementations return raw model text; validation and fallback are the
/// caller's job. The trait is object-safe for dynamic dispatch.
#[async_trait]
pub trait MeetingCapability: Send + Sync {
    /// Provider name (e.g., "openai", "mock")
    fn name(&self) -> &'static str;

    /// A short (1-3 sentence) in-character utterance.
    async fn generate_response(&self, request: ResponseRequest) -> Result<String>;

    /// A single roster name or the no-target token, unvalidated.
    async fn classify_addressee(&self, request: AddresseeRequest) -> Result<String>;

    /// Markdown report with Agenda, Discussion and Feedback sections.
    async fn summarize(&self, request: SummaryRequest) -> Result<String>;
}

/// Type alias for a shared capability reference
pub type SharedCapability = Arc<dyn MeetingCapability>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::GenerateResponse.to_string(), "generate_response");
        assert_eq!(Operation::ClassifyAddressee.as_str(), "classify_addressee");
        assert_eq!(Operation::Summarize.as_str(), "summarize");
    }
}
