use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{ContentBlock, Message, Role, SessionHeader};

const BLOCK_TYPE_TEXT: &str = "text";
const BLOCK_TYPE_TOOL_USE: &str = "tool_use";

/// Raw shape of one transcript line. Every field is optional so that
/// heterogeneous records (summaries, snapshots, partial writes) decode as
/// far as they can instead of failing outright.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    uuid: Option<String>,
    /// Left as a raw value: timestamps are usually ISO-8601 strings, but a
    /// non-string here must not reject the whole record.
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default, rename = "gitBranch")]
    git_branch: Option<String>,
    #[serde(default)]
    message: Option<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<RawContent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Other(Value),
}

/// Decode one transcript line into a [`Message`].
///
/// Returns `None` for anything that is not a JSON object carrying a
/// `message` object: malformed JSON, blank input, summary/snapshot records.
/// A missing role inside the message defaults to "unknown"; an unparseable
/// timestamp leaves the timestamp unset without dropping the message.
pub fn parse_line(line: &str) -> Option<Message> {
    message_from_record(decode_record(line)?)
}

fn decode_record(line: &str) -> Option<RawRecord> {
    serde_json::from_str(line.trim()).ok()
}

fn message_from_record(record: RawRecord) -> Option<Message> {
    let raw_message = record.message?;
    let role = raw_message.role.as_deref().map_or(Role::Unknown, Role::from_source);
    let (content, tool_calls) = flatten_content(raw_message.content);
    let timestamp =
        record.timestamp.as_ref().and_then(Value::as_str).and_then(parse_record_timestamp);

    Some(Message { role, content, timestamp, uuid: record.uuid, tool_calls })
}

/// Flatten the content field: strings pass through verbatim, block lists
/// collapse to the space-joined text of their `"text"` blocks (tool-use
/// blocks are collected separately, in order), anything else is empty.
fn flatten_content(content: Option<RawContent>) -> (String, Vec<ContentBlock>) {
    match content {
        Some(RawContent::Text(text)) => (text, Vec::new()),
        Some(RawContent::Blocks(blocks)) => {
            let text = blocks
                .iter()
                .filter(|block| block.block_type == BLOCK_TYPE_TEXT)
                .filter_map(|block| block.text.as_deref())
                .collect::<Vec<_>>()
                .join(" ");
            let tool_calls =
                blocks.into_iter().filter(|block| block.block_type == BLOCK_TYPE_TOOL_USE).collect();
            (text, tool_calls)
        }
        _ => (String::new(), Vec::new()),
    }
}

/// Parse an ISO-8601 timestamp string. Trailing `Z` and explicit offsets are
/// honored; a bare wall-clock time is taken as already UTC, matching the
/// stored format.
pub(crate) fn parse_record_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// Parse one transcript file into its session header and ordered messages.
///
/// Blank lines are skipped; lines that fail to decode are skipped without
/// affecting the rest of the file. Only a file-level I/O or encoding
/// failure returns `Err`, and callers treat such a session as skippable.
pub fn parse_transcript_file(path: &Path) -> Result<(SessionHeader, Vec<Message>)> {
    let file = File::open(path)
        .with_context(|| format!("failed to open session file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let session_id =
        path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
    let mut header = SessionHeader::new(session_id);
    let mut messages = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("failed to read line {} of {}", line_num + 1, path.display())
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(record) = decode_record(&line) else {
            tracing::debug!(
                line = line_num + 1,
                file = %path.display(),
                "skipping malformed transcript line"
            );
            continue;
        };

        if header.working_directory.is_none() && record.cwd.is_some() {
            header.working_directory = record.cwd.clone();
        }
        if header.git_branch.is_none() && record.git_branch.is_some() {
            header.git_branch = record.git_branch.clone();
        }

        if let Some(message) = message_from_record(record) {
            if let Some(timestamp) = message.timestamp {
                header.started_at =
                    Some(header.started_at.map_or(timestamp, |cur| cur.min(timestamp)));
                header.ended_at = Some(header.ended_at.map_or(timestamp, |cur| cur.max(timestamp)));
            }
            messages.push(message);
        }
    }

    Ok((header, messages))
}
