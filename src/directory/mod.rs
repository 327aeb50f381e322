//! Project and session discovery over the transcript root.
//!
//! Everything here is derived fresh from the filesystem on every call - no
//! caching - so results always reflect on-disk state. Missing directories
//! and unreadable files degrade to empty or shortened listings rather than
//! errors, matching the engine's best-effort contract.

pub mod projects;
pub mod sessions;

pub use projects::discover_projects;
pub use sessions::{find_session_file, recent_sessions, sessions_for_project};
