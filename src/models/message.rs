use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker category of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
    Unknown,
}

impl Role {
    /// Map a source-record role string onto the known set.
    /// Anything unrecognized becomes [`Role::Unknown`].
    pub fn from_source(raw: &str) -> Self {
        match raw {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::Unknown => "unknown",
        }
    }
}

/// One typed block from a structured content list.
///
/// Only `type`, `text` and the tool-invocation fields are modeled; anything
/// else a block carries is ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

/// One conversational turn, decoded from a single transcript line.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    /// Flattened text: structured content lists collapse to the
    /// space-joined text of their `"text"` blocks.
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub uuid: Option<String>,
    /// Tool-invocation blocks in source order; empty for plain-text content.
    pub tool_calls: Vec<ContentBlock>,
}

impl Message {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
