//! Roster loader: reads persona records from disk or the bundled default.
//!
//! Loading never halts the program: an unreadable or malformed roster is
//! reported once and the meeting runs with no personas.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::types::{Persona, Roster};

/// Bundled default roster, embedded at compile time.
const BUNDLED_ROSTER: &str = include_str!("../../config/personas.json");

/// Load the roster from `path`, or the bundled default when no path is given.
///
/// Any failure degrades to an empty roster.
pub fn load_roster(path: Option<&Path>) -> Roster {
    let result = match path {
        Some(path) => read_roster_file(path),
        None => parse_roster(BUNDLED_ROSTER, Path::new("<bundled>")),
    };

    match result {
        Ok(roster) => {
            info!(personas = roster.len(), names = ?roster.names(), "Persona roster loaded");
            roster
        }
        Err(e) => {
            warn!(
                error = %e.format_for_log(),
                "Persona roster unavailable, continuing with no personas"
            );
            Roster::empty()
        }
    }
}

/// The roster shipped with the binary.
#[cfg(test)]
pub fn bundled_roster() -> Roster {
    parse_roster(BUNDLED_ROSTER, Path::new("<bundled>")).unwrap_or_default()
}

fn read_roster_file(path: &Path) -> Result<Roster> {
    if !path.exists() {
        return Err(Error::RosterNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_roster(&content, path)
}

/// Parse a JSON array of persona records.
fn parse_roster(content: &str, origin: &Path) -> Result<Roster> {
    let records: Vec<Persona> =
        serde_json::from_str(content).map_err(|e| Error::RosterMalformed {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut personas: Vec<Persona> = Vec::with_capacity(records.len());
    for record in records {
        let name = record.name.trim();
        if name.is_empty() {
            warn!(origin = %origin.display(), "Skipping persona record with empty name");
            continue;
        }
        if personas.iter().any(|p| p.name == name) {
            warn!(origin = %origin.display(), name, "Skipping duplicate persona name");
            continue;
        }
        personas.push(Persona::new(name, record.trait_code.trim()));
    }

    debug!(origin = %origin.display(), count = personas.len(), "Parsed persona records");
    Ok(Roster::new(personas))
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
