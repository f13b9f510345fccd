//! Meeting session state.
//!
//! A `MeetingSession` exclusively owns its transcript and turn state. The
//! persona roster is never owned by a session.

use std::fmt;

use tracing::{debug, info};
use uuid::Uuid;

use super::transcript::{Transcript, TranscriptEntry};

/// Lifecycle of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingPhase {
    /// Fresh or reset session
    NotStarted,
    /// Topic set, turns alternating
    Active,
    /// Summarized; terminal until reset
    Ended,
}

impl Default for MeetingPhase {
    fn default() -> Self {
        MeetingPhase::NotStarted
    }
}

/// Which side holds the right to add the next transcript entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOwner {
    Human,
    Personas,
}

impl Default for TurnOwner {
    fn default() -> Self {
        TurnOwner::Human
    }
}

impl fmt::Display for TurnOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOwner::Human => write!(f, "human"),
            TurnOwner::Personas => write!(f, "personas"),
        }
    }
}

/// One meeting between the human participant and the roster.
#[derive(Debug, Clone)]
pub struct MeetingSession {
    id: Uuid,
    user_name: String,
    topic: String,
    transcript: Transcript,
    phase: MeetingPhase,
    turn_owner: TurnOwner,
    summary: Option<String>,
}

impl MeetingSession {
    /// Create an empty, not-yet-started session for the given human.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            topic: String::new(),
            transcript: Transcript::new(),
            phase: MeetingPhase::NotStarted,
            turn_owner: TurnOwner::Human,
            summary: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name used for the human's transcript entries.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> MeetingPhase {
        self.phase
    }

    pub fn turn_owner(&self) -> TurnOwner {
        self.turn_owner
    }

    /// True while the meeting is active.
    pub fn is_started(&self) -> bool {
        self.phase == MeetingPhase::Active
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Begin the meeting on `topic`.
    ///
    /// Only a not-started session can start; an ended meeting must be reset
    /// first. Returns whether the meeting was started.
    pub fn start(&mut self, topic: &str) -> bool {
        let topic = topic.trim();
        if self.phase != MeetingPhase::NotStarted || topic.is_empty() {
            debug!(session = %self.id, phase = ?self.phase, "Ignoring start request");
            return false;
        }

        self.topic = topic.to_string();
        self.transcript
            .push(TranscriptEntry::system(format!("Meeting started: {}", topic)));
        self.turn_owner = TurnOwner::Human;
        self.phase = MeetingPhase::Active;

        info!(session = %self.id, topic = %self.topic, "Meeting started");
        true
    }

    /// Record the human's utterance and hand the turn to the personas.
    ///
    /// No-op (returns false) unless the meeting is active, the human holds
    /// the turn and `text` has content.
    pub fn submit_human_line(&mut self, text: &str) -> bool {
        let text = text.trim();
        if !self.is_started() || self.turn_owner != TurnOwner::Human || text.is_empty() {
            debug!(
                session = %self.id,
                started = self.is_started(),
                turn = %self.turn_owner,
                empty = text.is_empty(),
                "Ignoring human line"
            );
            return false;
        }

        self.transcript
            .push(TranscriptEntry::human(self.user_name.clone(), text));
        self.turn_owner = TurnOwner::Personas;
        true
    }

    /// Discard everything and return to the not-started state.
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.topic.clear();
        self.transcript.clear();
        self.summary = None;
        self.phase = MeetingPhase::NotStarted;
        self.turn_owner = TurnOwner::Human;
        debug!(session = %self.id, "Meeting reset");
    }

    pub(crate) fn append(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    pub(crate) fn hand_turn_to_human(&mut self) {
        self.turn_owner = TurnOwner::Human;
    }

    pub(crate) fn finish(&mut self, summary: String) {
        self.summary = Some(summary);
        self.phase = MeetingPhase::Ended;
        self.turn_owner = TurnOwner::Human;
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
