//! Run status state machine and tool-call types.

use serde::{Deserialize, Serialize};

/// Status of a remote run.
///
/// `Completed`, `Failed`, `Cancelled`, and `Expired` are terminal — once
/// reported, the run never transitions again.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    Expired,
}

impl RunStatus {
    /// Whether no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired
        )
    }
}

/// A named invocation raised by a run while in `RequiresAction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier; pairs the call with its result on resubmission.
    pub id: String,
    pub name: String,
    /// Structured argument payload.
    pub arguments: serde_json::Value,
}

/// The result of one tool call, keyed by the call identifier.
///
/// `output` carries the tool's JSON result serialized to a string, which is
/// the form the remote backend accepts on resubmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}
