//! Persona roster: the fixed set of scripted meeting participants.
//!
//! Personas are loaded once per process and shared read-only by every
//! meeting session.

pub mod loader;
pub mod types;

pub use loader::load_roster;
pub use types::{Persona, Roster};
