//! Query engine: filtered full-text search with context windows, session
//! analysis, and message-detail lookup.
//!
//! Each operation is a self-contained scan resolved before returning; no
//! state persists across calls. Failures follow a strict taxonomy: bad
//! lines and unreadable sessions are contained and skipped, caller
//! mistakes surface as [`QueryError`] values, and a missing root reads as
//! "nothing found".

pub mod engine;
pub mod error;
pub mod time;

pub use engine::{
    AnalyzeParams, MAX_ANALYSIS_MESSAGES, MAX_SEARCH_RESULTS, RoleFilter, SearchEngine,
    SearchParams,
};
pub use error::QueryError;
