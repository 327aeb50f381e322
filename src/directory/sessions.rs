use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use walkdir::WalkDir;

use crate::models::SessionMeta;
use crate::parsers::parse_transcript_file;
use crate::utils::decode_project_name;

/// All session files (`*.jsonl`) directly inside `dir`, unordered.
pub(crate) fn session_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl")
        })
        .collect()
}

/// Modification time as UTC; `None` when metadata cannot be read.
pub(crate) fn file_modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok().map(DateTime::<Utc>::from)
}

/// List sessions of one project whose files were modified within the
/// lookback window, metadata-parsed.
///
/// Unreadable files are silently excluded. Results order by started_at
/// descending; sessions without a parseable start sort last (a sentinel
/// minimum), ties break on session id ascending.
pub fn sessions_for_project(root: &Path, project: &str, days_back: u32) -> Vec<SessionMeta> {
    let project_dir = root.join(project);
    let cutoff = Utc::now() - Duration::days(i64::from(days_back));
    let decoded = decode_project_name(project);

    let mut sessions = Vec::new();
    for file in session_files(&project_dir) {
        let Some(modified_at) = file_modified_at(&file) else {
            continue;
        };
        if modified_at < cutoff {
            continue;
        }

        let (header, messages) = match parse_transcript_file(&file) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(file = %file.display(), "excluding unreadable session: {e:#}");
                continue;
            }
        };

        sessions.push(SessionMeta {
            session_id: header.session_id,
            file_path: file,
            message_count: messages.len(),
            started_at: header.started_at,
            ended_at: header.ended_at,
            working_directory: header.working_directory,
            git_branch: header.git_branch,
            project: project.to_string(),
            project_decoded: decoded.clone(),
            modified_at,
        });
    }

    sort_by_start(&mut sessions);
    sessions
}

/// Union of [`sessions_for_project`] across all projects, or just the
/// filtered one. Each entry already carries its encoded and decoded
/// project names; the combined list uses the same ordering rule.
pub fn recent_sessions(
    root: &Path,
    days_back: u32,
    project_filter: Option<&str>,
) -> Vec<SessionMeta> {
    let mut all = Vec::new();

    match project_filter {
        Some(project) => all.extend(sessions_for_project(root, project, days_back)),
        None => {
            let Ok(entries) = fs::read_dir(root) else {
                return all;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                all.extend(sessions_for_project(root, &name, days_back));
            }
        }
    }

    sort_by_start(&mut all);
    all
}

/// Locate a session file by id across every project; first match wins
/// (session ids are assumed globally unique). The walk is name-ordered so
/// "first" is deterministic.
pub fn find_session_file(root: &Path, session_id: &str) -> Option<PathBuf> {
    let file_name = format!("{session_id}.jsonl");
    WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name)
        .map(|entry| entry.into_path())
}

fn sort_by_start(sessions: &mut [SessionMeta]) {
    sessions.sort_by(|a, b| {
        let a_start = a.started_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let b_start = b.started_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
        b_start.cmp(&a_start).then_with(|| a.session_id.cmp(&b.session_id))
    });
}
