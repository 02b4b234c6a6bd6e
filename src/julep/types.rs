//! Request and response payloads.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Output keys that may carry the joined itinerary, in lookup order.
const ITINERARY_KEYS: [&str; 2] = ["final_plan", "final_foodie_tour"];

#[derive(Debug, Clone, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Lifecycle state reported for an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Queued,
    Starting,
    Running,
    AwaitingInput,
    Succeeded,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    /// No further transitions happen after a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Queued => "queued",
            ExecutionStatus::Starting => "starting",
            ExecutionStatus::Running => "running",
            ExecutionStatus::AwaitingInput => "awaiting_input",
            ExecutionStatus::Succeeded => "succeeded",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Cancelled => "cancelled",
            ExecutionStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Execution {
    pub id: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Execution {
    /// The joined itinerary text, when the output carries one.
    pub fn itinerary(&self) -> Option<&str> {
        let output = self.output.as_ref()?;
        if let Some(text) = output.as_str() {
            return Some(text);
        }
        ITINERARY_KEYS
            .iter()
            .find_map(|key| output.get(key).and_then(Value::as_str))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateAgentRequest<'a> {
    pub name: &'a str,
    pub model: &'a str,
    pub about: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateExecutionRequest<'a> {
    pub input: &'a Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadFileRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub mime_type: &'a str,
    /// Base64 of the file bytes.
    pub content: String,
}
