//! Types describing one workflow's step graph as handed over by a graph store,
//! and the per-workflow linearization record produced from it.
//!
//! Raw step maps are validated exactly once, in [`StepGraph::from_raw`]; everything
//! downstream works on typed [`StepRecord`]s.

mod step;
pub use step::StepRecord;

mod graph;
pub use graph::StepGraph;

mod linearization;
pub use linearization::{LinearizationResult, SummaryRow};

mod finding;
pub use finding::Finding;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Malformed step record \"{step_id}\" in workflow \"{workflow_id}\": {reason}")]
    MalformedStepRecord {
        workflow_id: String,
        step_id: String,
        reason: String,
    },
    #[error("Steps of workflow \"{0}\" must be an object keyed by step id")]
    MalformedSteps(String),
}

impl Error {
    pub(crate) fn malformed(workflow_id: &str, step_id: &str, reason: impl ToString) -> Self {
        Self::MalformedStepRecord {
            workflow_id: workflow_id.to_owned(),
            step_id: step_id.to_owned(),
            reason: reason.to_string(),
        }
    }
}
