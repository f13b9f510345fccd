//! Meeting engine
//!
//! Session state, the transcript, and the turn scheduler that decides who
//! speaks after each human line.

pub mod addressee;
pub mod orchestrator;
pub mod selection;
pub mod session;
pub mod transcript;

pub use orchestrator::{OrchestratorSettings, TurnOrchestrator};
pub use session::MeetingSession;
pub use transcript::{Speaker, Transcript, TranscriptEntry};
