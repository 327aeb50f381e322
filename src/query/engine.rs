use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::directory::{find_session_file, recent_sessions};
use crate::models::{
    AnalysisReport, AnalysisSummary, ContextMessage, Message, MessageDetail, MessageDetailReport,
    MessageRecord, Role, RoleBreakdown, SearchReport, SearchResult, SessionMeta,
};
use crate::parsers::parse_transcript_file;
use crate::query::QueryError;
use crate::query::time::{effective_lookback_days, parse_time_bound};
use crate::utils::truncate_with_ellipsis;

/// Hard cap on returned search results; the true match count is still
/// reported so callers can detect truncation.
pub const MAX_SEARCH_RESULTS: usize = 20;
/// Hard cap on analyzer entries.
pub const MAX_ANALYSIS_MESSAGES: usize = 100;

/// Display caps. The matched message keeps more text than its surroundings.
const MATCH_CONTENT_CAP: usize = 300;
const CONTEXT_CONTENT_CAP: usize = 200;
const PREVIEW_CAP: usize = 100;
/// How many distinct session ids the analyzer aggregate samples.
const SESSION_SAMPLE: usize = 10;

/// Which speaker roles a query admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    User,
    Assistant,
    Tool,
    #[default]
    Both,
}

impl RoleFilter {
    /// Normalize a caller-supplied filter string. Unrecognized values
    /// coerce to `Both` rather than erroring.
    pub fn from_arg(raw: &str) -> Self {
        match raw {
            "user" => RoleFilter::User,
            "assistant" => RoleFilter::Assistant,
            "tool" => RoleFilter::Tool,
            _ => RoleFilter::Both,
        }
    }

    fn admits(self, role: Role) -> bool {
        match self {
            RoleFilter::User => role == Role::User,
            RoleFilter::Assistant => role == Role::Assistant,
            RoleFilter::Tool => role == Role::Tool,
            RoleFilter::Both => true,
        }
    }
}

/// Arguments for one search invocation. The adapter clamps numeric values
/// before constructing this; the engine takes them as given.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    /// Messages of context on each side of a match.
    pub context_window: usize,
    pub days_back: u32,
    pub project_filter: Option<String>,
    pub case_sensitive: bool,
    pub role_filter: RoleFilter,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl SearchParams {
    /// Defaults matching the tool surface: one week back, two messages of
    /// context, every role, case-insensitive, no time bounds.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context_window: 2,
            days_back: 7,
            project_filter: None,
            case_sensitive: false,
            role_filter: RoleFilter::Both,
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    pub days_back: u32,
    pub role_filter: RoleFilter,
    pub project_filter: Option<String>,
    pub include_tools: bool,
}

/// Stateless query engine: every call is a fresh scan of the transcript
/// root, so results always reflect on-disk state.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Filtered full-text search with context windows.
    ///
    /// The query is matched literally (no pattern syntax), case-insensitive
    /// unless requested otherwise. Sessions that fail to parse are skipped;
    /// only malformed time bounds surface as an error.
    pub fn search(&self, params: &SearchParams) -> Result<SearchReport, QueryError> {
        let start = params
            .start_time
            .as_deref()
            .map(|raw| parse_time_bound("start_time", raw, self.config.assumed_local_offset))
            .transpose()?;
        let end = params
            .end_time
            .as_deref()
            .map(|raw| parse_time_bound("end_time", raw, self.config.assumed_local_offset))
            .transpose()?;

        let days = effective_lookback_days(params.days_back, start, Utc::now());
        let candidates =
            recent_sessions(&self.config.projects_root, days, params.project_filter.as_deref());

        let needle =
            if params.case_sensitive { params.query.clone() } else { params.query.to_lowercase() };

        let mut total_matches = 0usize;
        let mut results = Vec::new();

        for session in &candidates {
            let (_, messages) = match parse_transcript_file(&session.file_path) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        file = %session.file_path.display(),
                        "skipping session during search: {e:#}"
                    );
                    continue;
                }
            };

            for (index, message) in messages.iter().enumerate() {
                if !params.role_filter.admits(message.role) {
                    continue;
                }
                if !within_bounds(message.timestamp, start, end) {
                    continue;
                }
                if !contains_query(&message.content, &needle, params.case_sensitive) {
                    continue;
                }

                total_matches += 1;
                if results.len() < MAX_SEARCH_RESULTS {
                    results.push(build_result(session, &messages, index, params.context_window));
                }
            }
        }

        Ok(SearchReport {
            query: params.query.clone(),
            total_matches,
            context_window_size: params.context_window,
            results,
        })
    }

    /// Per-message metadata over recent sessions, with aggregate counts.
    /// Full content never leaves this method; previews are capped.
    pub fn analyze(&self, params: &AnalyzeParams) -> AnalysisReport {
        let candidates = recent_sessions(
            &self.config.projects_root,
            params.days_back,
            params.project_filter.as_deref(),
        );

        let mut entries: Vec<MessageRecord> = Vec::new();
        let mut sessions_analyzed = 0usize;

        for session in &candidates {
            let (_, messages) = match parse_transcript_file(&session.file_path) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        file = %session.file_path.display(),
                        "skipping session during analysis: {e:#}"
                    );
                    continue;
                }
            };
            sessions_analyzed += 1;

            for (index, message) in messages.iter().enumerate() {
                if !params.role_filter.admits(message.role) {
                    continue;
                }
                // Tool chatter stays out of broad listings unless asked for,
                // or unless the filter itself selects it.
                if message.role == Role::Tool
                    && !params.include_tools
                    && params.role_filter != RoleFilter::Tool
                {
                    continue;
                }

                entries.push(MessageRecord {
                    session_id: session.session_id.clone(),
                    project: session.project_decoded.clone(),
                    timestamp: message.timestamp,
                    role: message.role,
                    content_preview: truncate_with_ellipsis(&message.content, PREVIEW_CAP),
                    content_length: message.content.chars().count(),
                    has_tool_uses: message.has_tool_calls(),
                    message_index: index,
                });
            }
        }

        let total_messages = entries.len();
        let summary = summarize_entries(&entries);
        entries.truncate(MAX_ANALYSIS_MESSAGES);

        AnalysisReport {
            sessions_analyzed,
            total_messages,
            messages_returned: entries.len(),
            truncated: total_messages > MAX_ANALYSIS_MESSAGES,
            messages: entries,
            summary,
        }
    }

    /// Full content for specific messages of one session, located by id
    /// across all projects. Out-of-range indices are silently dropped.
    pub fn message_details(
        &self,
        session_id: &str,
        indices: &[usize],
    ) -> Result<MessageDetailReport, QueryError> {
        let Some(file) = find_session_file(&self.config.projects_root, session_id) else {
            return Err(QueryError::SessionNotFound(session_id.to_string()));
        };
        let (_, messages) = parse_transcript_file(&file)
            .map_err(|_| QueryError::SessionNotFound(session_id.to_string()))?;

        let requested_messages = indices
            .iter()
            .copied()
            .filter(|&index| index < messages.len())
            .map(|index| {
                let message = &messages[index];
                MessageDetail {
                    index,
                    role: message.role,
                    content: message.content.clone(),
                    timestamp: message.timestamp,
                    has_tool_uses: message.has_tool_calls(),
                }
            })
            .collect();

        Ok(MessageDetailReport {
            session_id: session_id.to_string(),
            total_messages_in_session: messages.len(),
            requested_messages,
        })
    }
}

/// Inclusive range check. When either bound is set, a message without a
/// timestamp cannot qualify.
fn within_bounds(
    timestamp: Option<DateTime<Utc>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(timestamp) = timestamp else {
        return false;
    };
    if let Some(start) = start
        && timestamp < start
    {
        return false;
    }
    if let Some(end) = end
        && timestamp > end
    {
        return false;
    }
    true
}

/// Literal substring match; `needle` is pre-lowercased for the
/// case-insensitive path.
fn contains_query(content: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        content.contains(needle)
    } else {
        content.to_lowercase().contains(needle)
    }
}

fn build_result(
    session: &SessionMeta,
    messages: &[Message],
    index: usize,
    window: usize,
) -> SearchResult {
    let start_idx = index.saturating_sub(window);
    let end_idx = (index + window + 1).min(messages.len());

    let context_window = messages[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(offset, message)| ContextMessage {
            role: message.role,
            content: truncate_with_ellipsis(&message.content, CONTEXT_CONTENT_CAP),
            timestamp: message.timestamp,
            is_match: start_idx + offset == index,
            content_length: message.content.chars().count(),
        })
        .collect();

    let matched = &messages[index];
    SearchResult {
        session_id: session.session_id.clone(),
        project: session.project_decoded.clone(),
        match_timestamp: matched.timestamp,
        match_content: truncate_with_ellipsis(&matched.content, MATCH_CONTENT_CAP),
        match_content_length: matched.content.chars().count(),
        context_window,
    }
}

fn summarize_entries(entries: &[MessageRecord]) -> AnalysisSummary {
    let mut messages_by_role = RoleBreakdown::default();
    let mut total_length = 0usize;
    let mut sample: Vec<String> = Vec::new();

    for entry in entries {
        match entry.role {
            Role::User => messages_by_role.user += 1,
            Role::Assistant => messages_by_role.assistant += 1,
            Role::Tool => messages_by_role.tool += 1,
            Role::Unknown => {}
        }
        total_length += entry.content_length;

        if sample.len() < SESSION_SAMPLE {
            let abbreviated = abbreviate_session_id(&entry.session_id);
            if !sample.contains(&abbreviated) {
                sample.push(abbreviated);
            }
        }
    }

    let avg_content_length =
        if entries.is_empty() { 0.0 } else { total_length as f64 / entries.len() as f64 };

    AnalysisSummary { messages_by_role, avg_content_length, sessions_with_messages: sample }
}

fn abbreviate_session_id(id: &str) -> String {
    truncate_with_ellipsis(id, 8)
}
