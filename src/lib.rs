//! Search and retrieval over locally stored chat-session transcripts.
//!
//! Transcripts live as one append-only JSONL file per session, grouped into
//! per-project directories. This library scans that layout fresh on every
//! query - no persistent index, no caching - so results always reflect
//! on-disk state:
//!
//! - [`parsers`] decodes transcript lines into typed messages
//! - [`directory`] enumerates projects and sessions, ranked by recency
//! - [`query`] runs filtered full-text search with context windows,
//!   session analysis, and message-detail lookup
//! - [`server`] exposes the engine as MCP tools over stdio
//! - [`summarizer`] feeds search output to a text-generation process
//!
//! # Example
//!
//! ```no_run
//! use session_search::config::EngineConfig;
//! use session_search::query::{SearchEngine, SearchParams};
//!
//! let engine = SearchEngine::new(EngineConfig::from_env()?);
//! let report = engine.search(&SearchParams::new("deadlock"))?;
//! println!("{} matches", report.total_matches);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod directory;
pub mod models;
pub mod parsers;
pub mod query;
pub mod server;
pub mod summarizer;
pub mod utils;

// Re-export commonly used types
pub use config::EngineConfig;
pub use models::{Message, Role};
pub use query::{QueryError, SearchEngine, SearchParams};
