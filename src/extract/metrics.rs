use serde::Serialize;

use workflow::{Finding, LinearizationResult};

/// Workflow counts for one extraction run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMetrics {
    pub total_workflows: usize,
    /// workflows rejected as malformed
    pub failed_workflows: usize,
    pub empty_workflows: usize,
    pub workflows_missing_next_step: usize,
    pub workflows_with_branching: usize,
    pub workflows_with_tool_less_steps: usize,
    pub workflows_with_cycles: usize,
    /// repeated step ids across all output sequences; zero unless something is badly wrong
    pub duplicate_step_ids: usize,
}

impl ExtractionMetrics {
    /// Count one successfully linearized workflow.
    pub fn record(&mut self, result: &LinearizationResult) {
        for finding in result.findings() {
            log::debug!("{}: {finding}", result.workflow_id);
            match finding {
                Finding::EmptyGraph => self.empty_workflows += 1,
                Finding::MissingTargetStep => self.workflows_missing_next_step += 1,
                Finding::CycleDetected => self.workflows_with_cycles += 1,
                Finding::ToolMissing => self.workflows_with_tool_less_steps += 1,
            }
        }
        if result.is_branching() {
            self.workflows_with_branching += 1;
        }
        self.duplicate_step_ids += result.duplicate_step_count();
    }

    pub fn log(&self) {
        log::info!(
            "{} workflows: {} failed, {} empty, {} branching, {} with missing next steps, \
             {} with tool-less steps, {} with cycles",
            self.total_workflows,
            self.failed_workflows,
            self.empty_workflows,
            self.workflows_with_branching,
            self.workflows_missing_next_step,
            self.workflows_with_tool_less_steps,
            self.workflows_with_cycles,
        );
        if self.duplicate_step_ids > 0 {
            log::warn!("{} duplicate step ids in output sequences", self.duplicate_step_ids);
        }
    }
}
