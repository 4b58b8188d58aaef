//! Remote assistant-run backend boundary.
//!
//! The run driver and reconciler are clients of [`AssistantBackend`] only;
//! [`openai::OpenAiBackend`] is the production implementation, and tests
//! substitute scripted fakes.

pub mod http;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{RunStatus, ToolCall, ToolOutput};

/// A run as reported by the remote backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

impl RemoteRun {
    /// Tool calls pending in the current servicing round, if any.
    ///
    /// Present only when the run is in `RequiresAction` and the action kind
    /// is a tool-output submission.
    pub fn pending_tool_calls(&self) -> Option<Vec<ToolCall>> {
        let action = self.required_action.as_ref()?;
        if action.kind != "submit_tool_outputs" {
            return None;
        }
        let calls = action
            .submit_tool_outputs
            .tool_calls
            .iter()
            .map(RemoteToolCall::to_tool_call)
            .collect();
        Some(calls)
    }
}

/// The action a run is blocked on.
#[derive(Debug, Clone, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<RemoteToolCall>,
}

/// A tool call in backend wire form (arguments as a JSON string).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteToolCall {
    pub id: String,
    pub function: RemoteFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl RemoteToolCall {
    /// Decode into the engine's [`ToolCall`], treating an empty or invalid
    /// argument string as an empty object.
    pub fn to_tool_call(&self) -> ToolCall {
        let arguments = serde_json::from_str(&self.function.arguments)
            .unwrap_or_else(|_| serde_json::json!({}));
        ToolCall {
            id: self.id.clone(),
            name: self.function.name.clone(),
            arguments,
        }
    }
}

/// A message in the remote thread.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<RemoteContent>,
}

impl RemoteMessage {
    /// First text block of the message, if any.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find_map(|c| c.text.as_ref())
            .map(|t| t.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteContent {
    #[serde(default)]
    pub text: Option<RemoteText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteText {
    pub value: String,
}

/// Client interface to the remote assistant-run backend.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Create a new remote thread; returns its id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user message to a thread.
    async fn create_message(&self, thread_id: &str, text: &str) -> Result<()>;

    /// Start a run on a thread against the configured assistant.
    async fn create_run(&self, thread_id: &str) -> Result<RemoteRun>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RemoteRun>;

    /// List runs associated with a thread.
    async fn list_runs(&self, thread_id: &str) -> Result<Vec<RemoteRun>>;

    /// Request cancellation of a run. Fire-and-forget from the remote side's
    /// perspective; confirmation happens by polling.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<()>;

    /// Submit one complete batch of tool outputs for the current round.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<()>;

    /// List the newest messages in a thread.
    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<RemoteMessage>>;
}
