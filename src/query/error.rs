use thiserror::Error;

/// Failures reported as structured values across the tool boundary.
///
/// Parse-local and I/O failures never reach this type: bad lines are
/// skipped, unreadable sessions are excluded, and a missing root reads as
/// "nothing found". What remains are caller mistakes the caller can fix.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid {field} format: {value}. Use ISO format like 2025-09-13T08:00:00")]
    InvalidTimeBound { field: &'static str, value: String },

    #[error("session {0} not found")]
    SessionNotFound(String),
}
