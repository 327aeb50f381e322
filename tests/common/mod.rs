//! Shared test utilities: build a transcript root on disk.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a transcript root directory with per-project session files.
pub struct TranscriptRootBuilder {
    temp_dir: TempDir,
}

impl TranscriptRootBuilder {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a session file under `project` built from record builders.
    pub fn with_session(self, project: &str, session_id: &str, records: &[RecordBuilder]) -> Self {
        let lines: Vec<String> = records.iter().map(|record| record.to_json()).collect();
        self.with_raw_session(project, session_id, &lines.join("\n"))
    }

    /// Add a session file with verbatim content (for malformed fixtures).
    pub fn with_raw_session(self, project: &str, session_id: &str, content: &str) -> Self {
        let project_dir = self.temp_dir.path().join(project);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        let mut file = fs::File::create(project_dir.join(format!("{session_id}.jsonl")))
            .expect("Failed to create session file");
        file.write_all(content.as_bytes()).expect("Failed to write session file");
        self
    }

    /// Add an empty project directory (no session files).
    pub fn with_empty_project(self, project: &str) -> Self {
        fs::create_dir_all(self.temp_dir.path().join(project))
            .expect("Failed to create project dir");
        self
    }

    /// Build and return the temp directory (consumes self).
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for TranscriptRootBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one transcript record line.
pub struct RecordBuilder {
    role: String,
    content: Value,
    timestamp: Option<String>,
    uuid: Option<String>,
    cwd: Option<String>,
    git_branch: Option<String>,
}

impl RecordBuilder {
    pub fn role(role: &str) -> Self {
        Self {
            role: role.to_string(),
            content: json!(""),
            timestamp: None,
            uuid: None,
            cwd: None,
            git_branch: None,
        }
    }

    pub fn user() -> Self {
        Self::role("user")
    }

    pub fn assistant() -> Self {
        Self::role("assistant")
    }

    pub fn tool() -> Self {
        Self::role("tool")
    }

    /// Plain string content.
    pub fn text(mut self, text: &str) -> Self {
        self.content = json!(text);
        self
    }

    /// Structured block-list content.
    pub fn blocks(mut self, blocks: Value) -> Self {
        self.content = blocks;
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }

    pub fn git_branch(mut self, branch: &str) -> Self {
        self.git_branch = Some(branch.to_string());
        self
    }

    pub fn to_json(&self) -> String {
        let mut record = json!({
            "message": {
                "role": self.role,
                "content": self.content,
            }
        });
        if let Some(timestamp) = &self.timestamp {
            record["timestamp"] = json!(timestamp);
        }
        if let Some(uuid) = &self.uuid {
            record["uuid"] = json!(uuid);
        }
        if let Some(cwd) = &self.cwd {
            record["cwd"] = json!(cwd);
        }
        if let Some(branch) = &self.git_branch {
            record["gitBranch"] = json!(branch);
        }
        record.to_string()
    }
}
