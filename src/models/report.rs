//! Response payloads returned across the tool boundary.
//!
//! Every `*_length` field reports the length of the original, untruncated
//! content even when the accompanying text was cut for display, so callers
//! can always tell truncation occurred.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Role;

/// One entry of a match's context window.
#[derive(Debug, Clone, Serialize)]
pub struct ContextMessage {
    pub role: Role,
    /// Truncated for display.
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// True for exactly one entry per window: the matched message.
    pub is_match: bool,
    pub content_length: usize,
}

/// One search match with its surrounding context.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub session_id: String,
    /// Decoded project name.
    pub project: String,
    pub match_timestamp: Option<DateTime<Utc>>,
    /// Truncated for display.
    pub match_content: String,
    pub match_content_length: usize,
    pub context_window: Vec<ContextMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// True match count, independent of the result cap.
    pub total_matches: usize,
    pub context_window_size: usize,
    pub results: Vec<SearchResult>,
}

/// Per-message metadata surfaced by the analyzer; no full content.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub session_id: String,
    pub project: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub role: Role,
    pub content_preview: String,
    pub content_length: usize,
    pub has_tool_uses: bool,
    /// Index in the session's full message sequence; valid input for
    /// message-detail lookup.
    pub message_index: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RoleBreakdown {
    pub user: usize,
    pub assistant: usize,
    pub tool: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub messages_by_role: RoleBreakdown,
    pub avg_content_length: f64,
    /// First ten distinct abbreviated session ids, in scan order.
    pub sessions_with_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub sessions_analyzed: usize,
    pub total_messages: usize,
    pub messages_returned: usize,
    pub messages: Vec<MessageRecord>,
    pub truncated: bool,
    pub summary: AnalysisSummary,
}

/// One untruncated message returned by detail lookup.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDetail {
    pub index: usize,
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub has_tool_uses: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageDetailReport {
    pub session_id: String,
    pub total_messages_in_session: usize,
    pub requested_messages: Vec<MessageDetail>,
}

/// Output of the summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub start_time: String,
    pub end_time: String,
    /// Distinct sessions among the summarized matches.
    pub total_sessions: usize,
    pub total_messages: usize,
    pub summary_style: String,
    pub summary: String,
    pub key_topics: Vec<String>,
    pub insights: Vec<String>,
    pub stories: Vec<String>,
    pub projects_mentioned: Vec<String>,
    pub people_mentioned: Vec<String>,
    /// Generator failure, if any; the report is still best-effort usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
