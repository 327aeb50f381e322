//! MCP tool surface over the query engine.
//!
//! A thin adapter: each tool clamps caller-supplied numeric arguments,
//! delegates to the engine, and serializes the typed report as pretty JSON
//! in a text content block. Engine-level [`QueryError`]s become tool error
//! results carrying the message, never protocol faults.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::directory;
use crate::query::{AnalyzeParams, RoleFilter, SearchEngine, SearchParams};
use crate::summarizer::{ClaudeCli, Summarizer};

/// Adapter-enforced caps; the engine accepts whatever it is handed.
const MAX_DAYS_BACK: u32 = 7;
const MAX_CONTEXT_WINDOW: usize = 5;
const MAX_DETAIL_INDICES: usize = 10;

#[derive(Clone)]
pub struct SessionSearchService {
    engine: SearchEngine,
    tool_router: ToolRouter<Self>,
}

impl SessionSearchService {
    pub fn new(config: EngineConfig) -> Self {
        Self { engine: SearchEngine::new(config), tool_router: Self::tool_router() }
    }
}

#[tool_handler]
impl ServerHandler for SessionSearchService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search and analyze locally stored chat-session transcripts. Use \
                 'list_projects' to discover projects, 'search_conversations' for full-text \
                 search with context, 'analyze_sessions' for per-message metadata, and \
                 'get_message_details' to fetch full message content by index."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

fn error_result(message: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
}

fn clamp_days(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).min(MAX_DAYS_BACK)
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSessionsRequest {
    #[schemars(description = "Encoded project directory name (dashes instead of slashes)")]
    pub project_name: String,

    #[schemars(description = "How many days back to list (max 7)")]
    pub days_back: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecentSessionsRequest {
    #[schemars(description = "How many days back to list (max 7)")]
    pub days_back: Option<u32>,

    #[schemars(description = "Optional encoded project name to restrict the listing")]
    pub project_filter: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeSessionsRequest {
    #[schemars(description = "Days back to analyze (max 7)")]
    pub days_back: Option<u32>,

    #[schemars(description = "Filter messages by role: user, assistant, tool or both")]
    pub role_filter: Option<String>,

    #[schemars(description = "Optional encoded project name to restrict the analysis")]
    pub project_filter: Option<String>,

    #[schemars(description = "Include tool-role messages in the listing")]
    pub include_tools: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchConversationsRequest {
    #[schemars(description = "Term or phrase to find; matched literally, not as a pattern")]
    pub query: String,

    #[schemars(description = "Messages of context on each side of a match (max 5)")]
    pub context_window: Option<usize>,

    #[schemars(description = "Days back to search (max 7)")]
    pub days_back: Option<u32>,

    #[schemars(description = "Optional encoded project name to restrict the search")]
    pub project_filter: Option<String>,

    #[schemars(description = "Case sensitive matching")]
    pub case_sensitive: Option<bool>,

    #[schemars(description = "Filter matches by role: user, assistant, tool or both")]
    pub role_filter: Option<String>,

    #[schemars(description = "Earliest match time, ISO format; bare times use the local clock")]
    pub start_time: Option<String>,

    #[schemars(description = "Latest match time, ISO format; bare times use the local clock")]
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMessageDetailsRequest {
    #[schemars(description = "Session id to read from")]
    pub session_id: String,

    #[schemars(description = "Message indices to retrieve in full (max 10 used)")]
    pub message_indices: Vec<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SummarizeTimespanRequest {
    #[schemars(description = "Start of the range, ISO format")]
    pub start_time: String,

    #[schemars(description = "End of the range, ISO format")]
    pub end_time: String,

    #[schemars(description = "Summary style: journal, insights or stories")]
    pub style: Option<String>,

    #[schemars(description = "Optional encoded project name to restrict the summary")]
    pub project_filter: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SessionSearchService {
    #[tool(description = "List all projects with session counts and latest activity.")]
    pub async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        let projects = directory::discover_projects(&self.engine.config().projects_root);
        Ok(json_result(&projects))
    }

    #[tool(description = "List sessions for a specific project, newest first.")]
    pub async fn list_sessions(
        &self,
        Parameters(request): Parameters<ListSessionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let days_back = clamp_days(request.days_back, MAX_DAYS_BACK);
        let sessions = directory::sessions_for_project(
            &self.engine.config().projects_root,
            &request.project_name,
            days_back,
        );
        Ok(json_result(&sessions))
    }

    #[tool(description = "List recent sessions across all projects, newest first.")]
    pub async fn list_recent_sessions(
        &self,
        Parameters(request): Parameters<ListRecentSessionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let days_back = clamp_days(request.days_back, 1);
        let sessions = directory::recent_sessions(
            &self.engine.config().projects_root,
            days_back,
            request.project_filter.as_deref(),
        );
        Ok(json_result(&sessions))
    }

    #[tool(description = "Extract per-message metadata from recent sessions with role \
                          filtering and aggregate counts. No full content is returned.")]
    pub async fn analyze_sessions(
        &self,
        Parameters(request): Parameters<AnalyzeSessionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let params = AnalyzeParams {
            days_back: clamp_days(request.days_back, 1),
            role_filter: RoleFilter::from_arg(request.role_filter.as_deref().unwrap_or("both")),
            project_filter: request.project_filter,
            include_tools: request.include_tools.unwrap_or(false),
        };
        Ok(json_result(&self.engine.analyze(&params)))
    }

    #[tool(description = "Search conversations for a literal term with surrounding context. \
                          Content is truncated for manageable responses; reported lengths \
                          are always of the original text.")]
    pub async fn search_conversations(
        &self,
        Parameters(request): Parameters<SearchConversationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let params = SearchParams {
            query: request.query,
            context_window: request.context_window.unwrap_or(1).min(MAX_CONTEXT_WINDOW),
            days_back: clamp_days(request.days_back, MAX_DAYS_BACK),
            project_filter: request.project_filter,
            case_sensitive: request.case_sensitive.unwrap_or(false),
            role_filter: RoleFilter::from_arg(request.role_filter.as_deref().unwrap_or("both")),
            start_time: request.start_time,
            end_time: request.end_time,
        };
        match self.engine.search(&params) {
            Ok(report) => Ok(json_result(&report)),
            Err(e) => Ok(error_result(e)),
        }
    }

    #[tool(description = "Get full content for specific messages by session id and index.")]
    pub async fn get_message_details(
        &self,
        Parameters(request): Parameters<GetMessageDetailsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut indices = request.message_indices;
        indices.truncate(MAX_DETAIL_INDICES);

        match self.engine.message_details(&request.session_id, &indices) {
            Ok(report) => Ok(json_result(&report)),
            Err(e) => Ok(error_result(e)),
        }
    }

    #[tool(description = "Summarize user conversations in a time range via a local \
                          text-generation process.")]
    pub async fn summarize_timespan(
        &self,
        Parameters(request): Parameters<SummarizeTimespanRequest>,
    ) -> Result<CallToolResult, McpError> {
        let summarizer = Summarizer::new(self.engine.clone(), ClaudeCli::default());
        let style = request.style.as_deref().unwrap_or("journal");

        match summarizer.summarize_timespan(
            &request.start_time,
            &request.end_time,
            style,
            request.project_filter.as_deref(),
        ) {
            Ok(report) => Ok(json_result(&report)),
            Err(e) => Ok(error_result(e)),
        }
    }
}
