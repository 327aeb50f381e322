//! Summarization of search output via an external text-generation process.
//!
//! There is no algorithmic content here: the summarizer runs a broad search
//! over a time range, assembles a size-capped text blob from the results,
//! and hands it to a [`TextGenerator`]. The generator is injected so tests
//! never spawn a real process.

use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::models::{SearchReport, SummaryReport};
use crate::query::{QueryError, RoleFilter, SearchEngine, SearchParams};
use crate::utils::truncate_with_ellipsis;

/// Cap on the assembled transcript blob handed to the generator.
const CONTENT_CAP: usize = 6000;
/// Per-result cap inside the assembled blob.
const RESULT_CAP: usize = 500;
/// Lookback wide enough for any summarized time range to fall inside it.
const SUMMARY_LOOKBACK_DAYS: u32 = 30;

/// Text-generation capability.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Shells out to a local `claude` binary in print mode.
pub struct ClaudeCli {
    binary: String,
}

impl ClaudeCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new("claude")
    }
}

impl TextGenerator for ClaudeCli {
    fn generate(&self, prompt: &str) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(["--print", "--output-format", "text"])
            .arg(prompt)
            .output()
            .with_context(|| format!("failed to spawn {}", self.binary))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Shape the generator is asked to answer with. Parsed leniently; any
/// missing piece defaults to empty.
#[derive(Debug, Default, Deserialize)]
struct GeneratedSummary {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_topics: Vec<String>,
    #[serde(default)]
    insights: Vec<String>,
    #[serde(default)]
    stories: Vec<String>,
    #[serde(default)]
    projects_mentioned: Vec<String>,
    #[serde(default)]
    people_mentioned: Vec<String>,
}

pub struct Summarizer<G> {
    engine: SearchEngine,
    generator: G,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(engine: SearchEngine, generator: G) -> Self {
        Self { engine, generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Summarize user-side conversation activity between two time bounds.
    ///
    /// `Err` only for malformed bounds; a generator failure is reported in
    /// the returned report's `error` field instead of discarding the
    /// counts that were already computed.
    pub fn summarize_timespan(
        &self,
        start_time: &str,
        end_time: &str,
        style: &str,
        project_filter: Option<&str>,
    ) -> Result<SummaryReport, QueryError> {
        // "the" lands in most prose, making the search an activity sweep.
        let report = self.engine.search(&SearchParams {
            query: "the".to_string(),
            context_window: 1,
            days_back: SUMMARY_LOOKBACK_DAYS,
            project_filter: project_filter.map(str::to_string),
            case_sensitive: false,
            role_filter: RoleFilter::User,
            start_time: Some(start_time.to_string()),
            end_time: Some(end_time.to_string()),
        })?;

        if report.total_matches == 0 {
            return Ok(empty_report(
                start_time,
                end_time,
                style,
                "No conversations found for this time range.",
            ));
        }

        let content = assemble_content(&report, start_time, end_time);
        let prompt = build_prompt(&content, style);

        let mut summary_report = match self.generator.generate(&prompt) {
            Ok(response) => {
                let generated = parse_generator_response(&response);
                populated_report(start_time, end_time, style, &report, generated, None)
            }
            Err(e) => populated_report(
                start_time,
                end_time,
                style,
                &report,
                GeneratedSummary::default(),
                Some(format!("{e:#}")),
            ),
        };

        if summary_report.summary.is_empty() && summary_report.error.is_some() {
            summary_report.summary = "Summary generation failed".to_string();
        }
        Ok(summary_report)
    }
}

fn empty_report(start: &str, end: &str, style: &str, note: &str) -> SummaryReport {
    SummaryReport {
        start_time: start.to_string(),
        end_time: end.to_string(),
        total_sessions: 0,
        total_messages: 0,
        summary_style: style.to_string(),
        summary: note.to_string(),
        key_topics: Vec::new(),
        insights: Vec::new(),
        stories: Vec::new(),
        projects_mentioned: Vec::new(),
        people_mentioned: Vec::new(),
        error: None,
    }
}

fn populated_report(
    start: &str,
    end: &str,
    style: &str,
    search: &SearchReport,
    generated: GeneratedSummary,
    error: Option<String>,
) -> SummaryReport {
    let mut session_ids: Vec<&str> =
        search.results.iter().map(|result| result.session_id.as_str()).collect();
    session_ids.sort_unstable();
    session_ids.dedup();

    SummaryReport {
        start_time: start.to_string(),
        end_time: end.to_string(),
        total_sessions: session_ids.len(),
        total_messages: search.total_matches,
        summary_style: style.to_string(),
        summary: generated.summary,
        key_topics: generated.key_topics,
        insights: generated.insights,
        stories: generated.stories,
        projects_mentioned: generated.projects_mentioned,
        people_mentioned: generated.people_mentioned,
        error,
    }
}

/// Markdown blob of the matched user messages, capped at [`CONTENT_CAP`]
/// characters so the downstream process stays bounded.
fn assemble_content(report: &SearchReport, start: &str, end: &str) -> String {
    let mut parts = Vec::new();
    parts.push(format!("# Conversations from {start} to {end}"));
    parts.push(format!("Total messages: {}", report.total_matches));
    parts.push(String::new());

    for result in &report.results {
        parts.push(format!("## Session: {} ({})", result.session_id, result.project));
        if let Some(timestamp) = result.match_timestamp {
            parts.push(format!("**Time:** {}", timestamp.to_rfc3339()));
        }
        parts.push(format!(
            "**User message:** {}",
            truncate_with_ellipsis(&result.match_content, RESULT_CAP)
        ));
        parts.push(String::new());
    }

    let content = parts.join("\n");
    if content.chars().count() > CONTENT_CAP {
        let truncated: String = content.chars().take(CONTENT_CAP).collect();
        format!("{truncated}\n\n[content truncated]")
    } else {
        content
    }
}

fn build_prompt(content: &str, style: &str) -> String {
    let focus = match style {
        "insights" => {
            "Extract key insights and learning moments: technical breakthroughs, \
             problem-solving approaches, lessons learned, knowledge gaps identified."
        }
        "stories" => {
            "Identify experiences worth retelling: memorable interactions, \
             problem-solving journeys, challenges overcome, surprising discoveries."
        }
        // Unknown styles get the journal treatment.
        _ => {
            "Create a concise daily recap suitable for a personal journal: \
             accomplishments, decisions, people and projects mentioned, notable moments."
        }
    };

    format!(
        "Analyze the conversation excerpts below. {focus}\n\n\
         Respond with JSON in this shape:\n\
         {{\n  \"summary\": \"...\",\n  \"key_topics\": [],\n  \"insights\": [],\n  \
         \"stories\": [],\n  \"projects_mentioned\": [],\n  \"people_mentioned\": []\n}}\n\n\
         Conversation content:\n{content}"
    )
}

/// Pull a JSON object out of a generator response: fenced block first, then
/// the outermost braces. Anything unparseable falls back to using the raw
/// response as the summary text.
fn parse_generator_response(response: &str) -> GeneratedSummary {
    if let Some(json) = extract_json(response)
        && let Ok(parsed) = serde_json::from_str::<GeneratedSummary>(&json)
    {
        return parsed;
    }
    GeneratedSummary { summary: response.to_string(), ..GeneratedSummary::default() }
}

fn extract_json(response: &str) -> Option<String> {
    if let Some(fence_start) = response.find("```json") {
        let rest = &response[fence_start + 7..];
        let fence_end = rest.find("```")?;
        return Some(rest[..fence_end].trim().to_string());
    }
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| response[start..=end].to_string())
}
