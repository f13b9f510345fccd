//! Read-only views over a meeting: the shareable markdown log and the
//! summary document, plus saving both to disk.

mod log;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::error::{Error, Result};

pub use self::log::save_log;
pub use summary::{save_summary, summary_transcript};

/// Fixed label that replaces the human's display name in exported views.
pub const HUMAN_LABEL: &str = "User";

/// Timestamp layout used in titles and filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format `now` as `YYYYMMDD_HHMMSS`.
pub fn timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Write `content` to `dir/filename`, creating `dir` if needed.
fn write_document(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::IoWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(filename);
    fs::write(&path, content).map_err(|e| Error::IoWrite {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), bytes = content.len(), "Document saved");
    Ok(path)
}
