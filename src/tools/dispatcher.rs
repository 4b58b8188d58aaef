//! Maps tool calls to results, fanning out over a whole servicing round.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;

use super::arguments::ToolArguments;
use super::tool::Tool;
use crate::error::{Result, ZorvaError};
use crate::types::{ToolCall, ToolOutput};

/// Registry of tools keyed by name.
///
/// Cheap to clone; the registry is immutable after construction so
/// concurrent dispatches never contend.
#[derive(Clone)]
pub struct ToolDispatcher {
    tools: Arc<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolDispatcher {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let tools = tools
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self {
            tools: Arc::new(tools),
        }
    }

    /// Names of all registered tools.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Resolve a single tool call.
    ///
    /// Fails with [`ZorvaError::UnknownTool`] for unregistered names; a
    /// failing tool surfaces as [`ZorvaError::ToolExecution`].
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ZorvaError::UnknownTool(call.name.clone()))?;

        let args = ToolArguments::new(call.arguments.clone());
        let result = tool.execute(&args).await.map_err(|e| match e {
            err @ ZorvaError::ToolExecution { .. } => err,
            other => ZorvaError::tool(&call.name, other.to_string()),
        })?;

        Ok(ToolOutput {
            tool_call_id: call.id.clone(),
            output: serde_json::to_string(&result)?,
        })
    }

    /// Resolve every call of one servicing round concurrently.
    ///
    /// Batch-or-nothing: if any call fails, the whole round fails and no
    /// partial output set is produced.
    pub async fn dispatch_round(&self, calls: &[ToolCall]) -> Result<Vec<ToolOutput>> {
        try_join_all(calls.iter().map(|call| self.dispatch(call))).await
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
