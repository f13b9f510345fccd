//! Summary document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::meeting::{Speaker, Transcript};

use super::{timestamp, write_document, HUMAN_LABEL};

/// `meeting_summary_<timestamp>.md`
pub fn summary_filename(timestamp: &str) -> String {
    format!("meeting_summary_{}.md", timestamp)
}

/// The transcript as handed to the summarizer: system entries dropped,
/// the human relabelled `User`. Empty when nobody has spoken.
pub fn summary_transcript(transcript: &Transcript, user_name: &str) -> String {
    transcript
        .iter()
        .filter_map(|entry| {
            let label = match &entry.speaker {
                Speaker::System => return None,
                Speaker::Human(name) if name == user_name => HUMAN_LABEL,
                other => other.label(),
            };
            Some(format!("{}: {}", label, entry.text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Save the summary text verbatim under `dir`.
pub fn save_summary(dir: &Path, summary: &str, now: DateTime<Local>) -> Result<PathBuf> {
    write_document(dir, &summary_filename(&timestamp(&now)), summary)
}
