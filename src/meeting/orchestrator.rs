//! Turn orchestration.
//!
//! Drives one meeting session: after every human line it works out who
//! speaks, collects their utterances one at a time and hands the turn back.
//! Capability failures never escape from here; they become placeholder
//! text or fall back to the default path.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use crate::capability::{Operation, ResponseRequest, SharedCapability, SummaryRequest};
use crate::config::MeetingConfig;
use crate::error::{Error, Result};
use crate::persona::{Persona, Roster};
use crate::report::summary_transcript;

use super::addressee::AddresseeResolver;
use super::selection::select_speakers;
use super::session::{MeetingSession, TurnOwner};
use super::transcript::TranscriptEntry;

/// Default number of persona lines shown to the addressee classifier.
pub const DEFAULT_ADDRESSEE_WINDOW: usize = 3;

/// Summary returned when nobody has said anything yet.
pub const NOTHING_TO_SUMMARIZE: &str = "Nothing to summarize.";

/// Summary returned when the capability could not produce one.
pub const SUMMARY_FAILED: &str = "Summary generation failed.";

/// Placeholder utterance for a persona whose response could not be generated.
pub fn response_failure_text(persona_name: &str) -> String {
    format!("response generation failed for {}", persona_name)
}

// ─────────────────────────────────────────────────────────────────
// Settings & Outcome
// ─────────────────────────────────────────────────────────────────

/// Tunables for the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Persona lines preceding the human line used as addressing context
    pub addressee_window: usize,

    /// Deadline for any single capability call
    pub capability_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            addressee_window: DEFAULT_ADDRESSEE_WINDOW,
            capability_timeout: Duration::from_secs(60),
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &MeetingConfig) -> Self {
        Self {
            addressee_window: config.meeting.addressee_window,
            capability_timeout: config.capability_timeout(),
        }
    }
}

/// What a persona turn did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Persona the human addressed, if one was resolved
    pub target: Option<String>,

    /// Personas that spoke, in speaking order
    pub speakers: Vec<String>,

    /// Transcript entries added by this turn
    pub appended: usize,
}

impl TurnOutcome {
    /// True when the turn did not run at all or nobody spoke.
    pub fn is_silent(&self) -> bool {
        self.appended == 0
    }
}

// ─────────────────────────────────────────────────────────────────
// Turn Orchestrator
// ─────────────────────────────────────────────────────────────────

/// Scheduler tying addressee resolution, speaker selection and response
/// generation together.
///
/// Capability calls are awaited strictly one after another: each speaker
/// sees the lines appended by earlier speakers in the same turn.
pub struct TurnOrchestrator {
    capability: SharedCapability,
    resolver: AddresseeResolver,
    rng: StdRng,
    settings: OrchestratorSettings,
}

impl TurnOrchestrator {
    /// Create an orchestrator with an entropy-seeded RNG
    pub fn new(capability: SharedCapability, settings: OrchestratorSettings) -> Self {
        Self::with_rng(capability, settings, StdRng::from_entropy())
    }

    /// Create an orchestrator whose speaker selection is reproducible
    pub fn with_seed(
        capability: SharedCapability,
        settings: OrchestratorSettings,
        seed: u64,
    ) -> Self {
        Self::with_rng(capability, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capability: SharedCapability, settings: OrchestratorSettings, rng: StdRng) -> Self {
        let resolver = AddresseeResolver::new(capability.clone(), settings.capability_timeout);
        Self {
            capability,
            resolver,
            rng,
            settings,
        }
    }

    /// Name of the underlying capability provider
    pub fn capability_name(&self) -> &'static str {
        self.capability.name()
    }

    /// Let the personas answer the latest human line.
    ///
    /// Does nothing unless the meeting is active and the personas hold the
    /// turn. Always returns the turn to the human when it runs.
    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn run_persona_turn(
        &mut self,
        session: &mut MeetingSession,
        roster: &Roster,
    ) -> TurnOutcome {
        if !session.is_started() || session.turn_owner() != TurnOwner::Personas {
            debug!(turn = %session.turn_owner(), "Persona turn skipped");
            return TurnOutcome::default();
        }

        // 1. Addressing context: the human line and the persona lines before it
        let transcript = session.transcript();
        let (human_text, recent) = match transcript.last() {
            Some(last) if last.speaker.is_human() => {
                let before = transcript.len() - 1;
                (
                    last.text.clone(),
                    transcript.recent_persona_entries(before, self.settings.addressee_window),
                )
            }
            _ => (String::new(), Vec::new()),
        };

        // 2. Addressee
        let target = self
            .resolver
            .resolve(&human_text, &roster.names(), &recent)
            .await;

        // 3. Speakers
        let speakers: Vec<Persona> = match target.as_deref().and_then(|name| roster.get(name)) {
            Some(persona) => vec![persona.clone()],
            None => select_speakers(roster, &mut self.rng),
        };

        let mut outcome = TurnOutcome {
            target,
            ..Default::default()
        };

        // 4. Nobody to speak
        if speakers.is_empty() {
            debug!("No personas available, returning turn");
            session.hand_turn_to_human();
            return outcome;
        }

        info!(
            target = ?outcome.target,
            speakers = ?speakers.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "Persona turn"
        );

        // 5. One utterance per speaker, each appended before the next is requested
        for persona in speakers {
            let request = ResponseRequest {
                persona: persona.clone(),
                topic: session.topic().to_string(),
                transcript: session.transcript().render_lines(),
            };

            let generate = self.capability.generate_response(request);
            let text = match self.call(Operation::GenerateResponse, generate).await {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                Ok(_) => {
                    warn!(persona = %persona.name, "Empty response, using placeholder");
                    response_failure_text(&persona.name)
                }
                Err(e) => {
                    warn!(persona = %persona.name, error = %e, "Response generation failed");
                    response_failure_text(&persona.name)
                }
            };

            session.append(TranscriptEntry::persona(persona.name.clone(), text));
            outcome.speakers.push(persona.name);
            outcome.appended += 1;
        }

        // 6. Back to the human
        session.hand_turn_to_human();
        outcome
    }

    /// End the meeting and produce its summary.
    ///
    /// Returns `None` if the meeting is not active. Otherwise the meeting
    /// ends whatever happens and the returned text is also stored on the
    /// session.
    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn end_meeting(&self, session: &mut MeetingSession) -> Option<String> {
        if !session.is_started() {
            debug!(phase = ?session.phase(), "End request ignored");
            return None;
        }

        let transcript = summary_transcript(session.transcript(), session.user_name());

        let summary = if transcript.is_empty() {
            debug!("Transcript has no remarks, skipping summarization");
            NOTHING_TO_SUMMARIZE.to_string()
        } else {
            let request = SummaryRequest {
                topic: session.topic().to_string(),
                transcript,
            };
            match self.call(Operation::Summarize, self.capability.summarize(request)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Summary generation failed");
                    SUMMARY_FAILED.to_string()
                }
            }
        };

        session.finish(summary.clone());
        info!(entries = session.transcript().len(), "Meeting ended");
        Some(summary)
    }

    /// Await a capability future under the configured deadline.
    async fn call<F>(&self, operation: Operation, fut: F) -> Result<String>
    where
        F: std::future::Future<Output = Result<String>>,
    {
        let timeout = self.settings.capability_timeout;
        tokio::time::timeout(timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(Error::CapabilityTimeout {
                    operation: operation.to_string(),
                    timeout_secs: timeout.as_secs(),
                })
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
