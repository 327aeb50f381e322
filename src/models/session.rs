use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-file metadata derived while parsing a transcript.
#[derive(Debug, Clone, Default)]
pub struct SessionHeader {
    /// File stem of the transcript file.
    pub session_id: String,
    /// Earliest parseable message timestamp, if any.
    pub started_at: Option<DateTime<Utc>>,
    /// Latest parseable message timestamp, if any.
    pub ended_at: Option<DateTime<Utc>>,
    /// First `cwd` seen across the file's records.
    pub working_directory: Option<String>,
    /// First `gitBranch` seen across the file's records.
    pub git_branch: Option<String>,
}

impl SessionHeader {
    pub fn new(session_id: String) -> Self {
        Self { session_id, ..Self::default() }
    }
}

/// One project directory under the transcript root.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    /// Encoded directory name (slashes replaced by dashes).
    pub name: String,
    pub path: PathBuf,
    pub session_count: usize,
    /// Max modification time over the project's session files.
    pub latest_activity: DateTime<Utc>,
    pub decoded_name: String,
}

/// Listing entry for one session file.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMeta {
    pub session_id: String,
    pub file_path: PathBuf,
    pub message_count: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub working_directory: Option<String>,
    pub git_branch: Option<String>,
    /// Encoded name of the owning project directory.
    pub project: String,
    pub project_decoded: String,
    /// File modification time, the recency proxy for lookback scans.
    pub modified_at: DateTime<Utc>,
}
