//! Markdown meeting log.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::meeting::{MeetingSession, Speaker};
use crate::persona::Roster;

use super::{timestamp, write_document, HUMAN_LABEL};

/// `meeting_log_<timestamp>.md`
pub fn log_filename(timestamp: &str) -> String {
    format!("meeting_log_{}.md", timestamp)
}

/// Render the whole transcript as a markdown document.
///
/// System entries become italic notes, everything else a bold speaker line.
/// The human is always shown as `User`.
pub fn render_log(session: &MeetingSession, roster: &Roster, timestamp: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Meeting Log ({})\n", timestamp);
    let _ = writeln!(out, "**Topic:** {}", session.topic());

    let names = roster.names();
    if names.is_empty() {
        let _ = writeln!(out, "**Participants:** {} ({})\n", session.user_name(), HUMAN_LABEL);
    } else {
        let _ = writeln!(
            out,
            "**Participants:** {} ({}), {}\n",
            session.user_name(),
            HUMAN_LABEL,
            names.join(", ")
        );
    }
    out.push_str("---\n\n");

    for entry in session.transcript().iter() {
        let text = entry.text.trim();
        match &entry.speaker {
            Speaker::System => {
                let _ = writeln!(out, "*({})*\n", text);
            }
            Speaker::Human(_) => {
                let _ = writeln!(out, "**{}:** {}\n", HUMAN_LABEL, text);
            }
            Speaker::Persona(name) => {
                let _ = writeln!(out, "**{}:** {}\n", name, text);
            }
        }
    }

    out
}

/// Save the rendered log under `dir`.
///
/// Refuses an empty transcript. The session itself is never modified.
pub fn save_log(
    dir: &Path,
    session: &MeetingSession,
    roster: &Roster,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    if session.transcript().is_empty() {
        return Err(Error::NothingToExport);
    }

    let ts = timestamp(&now);
    let content = render_log(session, roster, &ts);
    write_document(dir, &log_filename(&ts), &content)
}
