//! Drives one run from creation to a terminal status, servicing tool calls.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::backend::AssistantBackend;
use crate::config::ZorvaConfig;
use crate::error::{Result, ZorvaError};
use crate::tools::ToolDispatcher;
use crate::types::{RunStatus, ToolOutput};

/// Terminal status of a run plus the most recent tool-output batch.
///
/// Earlier rounds' outputs are superseded, not accumulated.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub tool_outputs: Vec<ToolOutput>,
}

/// Owns the lifecycle of one run.
///
/// Polls the remote status, performs exactly one dispatch-and-resubmit round
/// per `RequiresAction`, and stops on the first terminal status. Suspends
/// between polls so other requests keep making progress.
pub struct RunDriver {
    backend: Arc<dyn AssistantBackend>,
    dispatcher: ToolDispatcher,
    poll_interval: Duration,
    run_timeout: Option<Duration>,
}

impl RunDriver {
    pub fn new(
        backend: Arc<dyn AssistantBackend>,
        dispatcher: ToolDispatcher,
        config: &ZorvaConfig,
    ) -> Self {
        Self {
            backend,
            dispatcher,
            poll_interval: config.poll_interval,
            run_timeout: config.run_timeout,
        }
    }

    /// Drive the run until it reaches a terminal status.
    ///
    /// A tool round is batch-or-nothing: every call in the round must
    /// resolve before outputs are resubmitted. A failing round (unknown
    /// tool, tool error, or submit failure) fails the whole run here and
    /// leaves the remote run in its current state.
    ///
    /// When a wall-clock timeout is configured, a run that outlives it
    /// fails with [`ZorvaError::RunTimeout`] instead of looping forever on
    /// a stuck remote run.
    pub async fn drive(&self, thread_id: &str, run_id: &str) -> Result<RunOutcome> {
        let deadline = self.run_timeout.map(|t| Instant::now() + t);
        let mut latest_outputs: Vec<ToolOutput> = Vec::new();

        loop {
            let run = self.backend.retrieve_run(thread_id, run_id).await?;

            if run.status == RunStatus::RequiresAction {
                if let Some(calls) = run.pending_tool_calls() {
                    tracing::debug!(run_id, calls = calls.len(), "servicing tool round");
                    let outputs = self.dispatcher.dispatch_round(&calls).await?;
                    self.backend
                        .submit_tool_outputs(thread_id, run_id, &outputs)
                        .await?;
                    // Last round supersedes earlier ones.
                    latest_outputs = outputs;
                }
            }

            if run.status.is_terminal() {
                tracing::debug!(run_id, status = %run.status, "run reached terminal status");
                return Ok(RunOutcome {
                    status: run.status,
                    tool_outputs: latest_outputs,
                });
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    let timeout = self.run_timeout.unwrap_or_default();
                    tracing::warn!(run_id, timeout_ms = timeout.as_millis() as u64, "run timed out");
                    return Err(ZorvaError::RunTimeout(timeout.as_millis() as u64));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::backend::{RemoteMessage, RemoteRun};
    use crate::tools::tool::{FnTool, Tool};
    use crate::tools::types::ToolParameters;

    /// Backend fake that replays a scripted sequence of run states and
    /// records every submitted output batch.
    struct ScriptedBackend {
        states: Mutex<VecDeque<RemoteRun>>,
        submitted: Mutex<Vec<Vec<ToolOutput>>>,
    }

    impl ScriptedBackend {
        fn new(states: Vec<serde_json::Value>) -> Self {
            let states = states
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect();
            Self {
                states: Mutex::new(states),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AssistantBackend for ScriptedBackend {
        async fn create_thread(&self) -> Result<String> {
            Ok("thread_1".into())
        }
        async fn create_message(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn create_run(&self, _: &str) -> Result<RemoteRun> {
            unreachable!("driver never creates runs")
        }
        async fn retrieve_run(&self, _: &str, _: &str) -> Result<RemoteRun> {
            let mut states = self.states.lock().unwrap();
            // Hold the last state once the script is exhausted.
            if states.len() > 1 {
                Ok(states.pop_front().unwrap())
            } else {
                Ok(states.front().cloned().expect("script is empty"))
            }
        }
        async fn list_runs(&self, _: &str) -> Result<Vec<RemoteRun>> {
            Ok(Vec::new())
        }
        async fn cancel_run(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn submit_tool_outputs(
            &self,
            _: &str,
            _: &str,
            outputs: &[ToolOutput],
        ) -> Result<()> {
            self.submitted.lock().unwrap().push(outputs.to_vec());
            Ok(())
        }
        async fn list_messages(&self, _: &str, _: u32) -> Result<Vec<RemoteMessage>> {
            Ok(Vec::new())
        }
    }

    fn echo_tool(name: &str) -> Arc<dyn Tool> {
        let owned = name.to_string();
        Arc::new(FnTool::new(
            name,
            "echoes its name",
            ToolParameters::object().build(),
            move |_args| {
                let name = owned.clone();
                async move { Ok(serde_json::json!({ "tool": name })) }
            },
        ))
    }

    fn run_state(status: &str) -> serde_json::Value {
        serde_json::json!({ "id": "run_1", "status": status })
    }

    fn requires_action(calls: &[(&str, &str)]) -> serde_json::Value {
        let tool_calls: Vec<_> = calls
            .iter()
            .map(|(id, name)| {
                serde_json::json!({
                    "id": id,
                    "function": { "name": name, "arguments": "{}" }
                })
            })
            .collect();
        serde_json::json!({
            "id": "run_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": { "tool_calls": tool_calls }
            }
        })
    }

    fn driver_with(
        backend: Arc<ScriptedBackend>,
        tools: Vec<Arc<dyn Tool>>,
    ) -> RunDriver {
        let config = ZorvaConfig::new("sk-test", "asst_1")
            .with_poll_interval(Duration::from_millis(10));
        RunDriver::new(backend, ToolDispatcher::new(tools), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn completes_without_tool_calls() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            run_state("queued"),
            run_state("in_progress"),
            run_state("completed"),
        ]));
        let driver = driver_with(backend.clone(), vec![]);

        let outcome = driver.drive("thread_1", "run_1").await.unwrap();
        assert_eq!(outcome.status, RunStatus::Completed);
        assert!(outcome.tool_outputs.is_empty());
        assert!(backend.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn services_a_two_call_round_as_one_batch() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            requires_action(&[("call_a", "toolA"), ("call_b", "toolB")]),
            run_state("completed"),
        ]));
        let driver = driver_with(backend.clone(), vec![echo_tool("toolA"), echo_tool("toolB")]);

        let outcome = driver.drive("thread_1", "run_1").await.unwrap();
        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.tool_outputs.len(), 2);

        let submitted = backend.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1, "exactly one resubmission round");
        let ids: Vec<_> = submitted[0]
            .iter()
            .map(|o| o.tool_call_id.as_str())
            .collect();
        assert!(ids.contains(&"call_a"));
        assert!(ids.contains(&"call_b"));
    }

    #[tokio::test(start_paused = true)]
    async fn later_round_supersedes_earlier_outputs() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            requires_action(&[("call_1", "toolA")]),
            requires_action(&[("call_2", "toolB")]),
            run_state("completed"),
        ]));
        let driver = driver_with(backend.clone(), vec![echo_tool("toolA"), echo_tool("toolB")]);

        let outcome = driver.drive("thread_1", "run_1").await.unwrap();
        assert_eq!(outcome.tool_outputs.len(), 1);
        assert_eq!(outcome.tool_outputs[0].tool_call_id, "call_2");
        assert_eq!(backend.submitted.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_tool_fails_the_run_without_partial_submit() {
        let backend = Arc::new(ScriptedBackend::new(vec![requires_action(&[
            ("call_a", "toolA"),
            ("call_b", "nonexistent"),
        ])]));
        let driver = driver_with(backend.clone(), vec![echo_tool("toolA")]);

        let err = driver.drive("thread_1", "run_1").await.unwrap_err();
        assert!(matches!(err, ZorvaError::UnknownTool(_)));
        assert!(
            backend.submitted.lock().unwrap().is_empty(),
            "partial results must never be submitted"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_terminal_status_is_returned_not_errored() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            run_state("in_progress"),
            run_state("failed"),
        ]));
        let driver = driver_with(backend, vec![]);

        let outcome = driver.drive("thread_1", "run_1").await.unwrap();
        assert_eq!(outcome.status, RunStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_run_times_out() {
        // Script never leaves in_progress.
        let backend = Arc::new(ScriptedBackend::new(vec![run_state("in_progress")]));
        let config = ZorvaConfig::new("sk-test", "asst_1")
            .with_poll_interval(Duration::from_millis(10))
            .with_run_timeout(Some(Duration::from_millis(100)));
        let driver = RunDriver::new(backend, ToolDispatcher::new(vec![]), &config);

        let err = driver.drive("thread_1", "run_1").await.unwrap_err();
        assert!(matches!(err, ZorvaError::RunTimeout(100)));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_and_cancelled_are_terminal() {
        for status in ["expired", "cancelled"] {
            let backend = Arc::new(ScriptedBackend::new(vec![run_state(status)]));
            let driver = driver_with(backend, vec![]);
            let outcome = driver.drive("thread_1", "run_1").await.unwrap();
            assert!(outcome.status.is_terminal());
        }
    }
}
