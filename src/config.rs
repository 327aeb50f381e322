use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local};

/// Environment override for the transcript root.
pub const ROOT_ENV_VAR: &str = "SESSION_SEARCH_ROOT";

/// Settings shared by every query.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding one subdirectory of session files per project.
    pub projects_root: PathBuf,
    /// Offset applied to caller-supplied time bounds that carry no
    /// timezone. Naive timestamps inside transcripts are always taken as
    /// UTC; this only stands in for the caller's wall clock, and defaults
    /// to the process-local offset at construction.
    pub assumed_local_offset: FixedOffset,
}

impl EngineConfig {
    pub fn new(projects_root: PathBuf) -> Self {
        Self { projects_root, assumed_local_offset: *Local::now().offset() }
    }

    /// Resolve the root from the environment: `$SESSION_SEARCH_ROOT` if
    /// set, else `~/.claude/projects`.
    pub fn from_env() -> Result<Self> {
        if let Ok(root) = env::var(ROOT_ENV_VAR) {
            return Ok(Self::new(PathBuf::from(root)));
        }
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(Self::new(home.join(".claude").join("projects")))
    }

    pub fn with_assumed_local_offset(mut self, offset: FixedOffset) -> Self {
        self.assumed_local_offset = offset;
        self
    }
}
