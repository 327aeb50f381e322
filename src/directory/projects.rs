use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::directory::sessions::{file_modified_at, session_files};
use crate::models::ProjectInfo;
use crate::utils::decode_project_name;

/// Enumerate project directories under the transcript root.
///
/// Only immediate subdirectories holding at least one session file count.
/// Results are ordered by latest activity descending; equal activity falls
/// back to the encoded name ascending so listings stay deterministic.
///
/// A missing or unreadable root yields an empty list, never an error.
pub fn discover_projects(root: &Path) -> Vec<ProjectInfo> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(root = %root.display(), "cannot read transcript root: {e}");
            return Vec::new();
        }
    };

    let mut projects = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let files = session_files(&path);
        if files.is_empty() {
            continue;
        }

        let latest_activity = files
            .iter()
            .filter_map(|file| file_modified_at(file))
            .max()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        projects.push(ProjectInfo {
            decoded_name: decode_project_name(&name),
            name,
            path,
            session_count: files.len(),
            latest_activity,
        });
    }

    projects.sort_by(|a, b| {
        b.latest_activity.cmp(&a.latest_activity).then_with(|| a.name.cmp(&b.name))
    });
    projects
}
