//! Clears stale runs before a new one is created.
//!
//! A prior request may have been interrupted (client disconnect, crash)
//! leaving an orphaned active run. Reconciliation cancels every non-terminal
//! run on the conversation's thread and waits — bounded — for each to die.
//! It is best-effort: a run that refuses to terminate within the ceiling is
//! logged and the caller proceeds regardless.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;

use crate::backend::AssistantBackend;
use crate::config::ZorvaConfig;
use crate::error::Result;

pub struct RunReconciler {
    backend: Arc<dyn AssistantBackend>,
    poll_interval: Duration,
    ceiling: Duration,
}

impl RunReconciler {
    pub fn new(backend: Arc<dyn AssistantBackend>, config: &ZorvaConfig) -> Self {
        Self {
            backend,
            poll_interval: config.reconcile_poll_interval,
            ceiling: config.reconcile_ceiling,
        }
    }

    /// Cancel every non-terminal run on the thread, then confirm each
    /// termination with a bounded poll.
    ///
    /// Cancellation and confirmation failures are logged, never fatal; only
    /// the initial listing can fail the call.
    pub async fn reconcile(&self, thread_id: &str) -> Result<()> {
        let runs = self.backend.list_runs(thread_id).await?;
        let stale: Vec<_> = runs.into_iter().filter(|r| !r.status.is_terminal()).collect();
        if stale.is_empty() {
            return Ok(());
        }

        tracing::debug!(thread_id, stale = stale.len(), "cancelling stale runs");

        let cancellations = stale
            .iter()
            .map(|run| self.backend.cancel_run(thread_id, &run.id));
        for (run, result) in stale.iter().zip(join_all(cancellations).await) {
            if let Err(err) = result {
                tracing::warn!(run_id = %run.id, error = %err, "cancel request failed");
            }
        }

        for run in &stale {
            self.confirm_terminated(thread_id, &run.id).await;
        }

        Ok(())
    }

    /// Poll one run until it reaches a terminal status or the ceiling lapses.
    async fn confirm_terminated(&self, thread_id: &str, run_id: &str) {
        let deadline = Instant::now() + self.ceiling;

        loop {
            match self.backend.retrieve_run(thread_id, run_id).await {
                Ok(run) if run.status.is_terminal() => {
                    tracing::debug!(run_id, status = %run.status, "stale run terminated");
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(run_id, error = %err, "status check failed during reconcile");
                    return;
                }
            }

            if Instant::now() >= deadline {
                tracing::warn!(run_id, "stale run did not terminate within ceiling");
                return;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
