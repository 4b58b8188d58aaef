//! Run lifecycle: driving a run to completion and reconciling stale runs.

pub mod driver;
pub mod reconciler;

pub use driver::{RunDriver, RunOutcome};
pub use reconciler::RunReconciler;
