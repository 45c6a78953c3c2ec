use traverse::{GraphLinearizer, StartPolicy};
use workflow::{LinearizationResult, StepGraph};

use crate::diagnostics::Diagnostics;
use crate::source::{SourceBatches, WorkflowSource};

/// Counters over a whole extraction run
mod metrics;
pub use metrics::ExtractionMetrics;

/// Everything one extraction run produced, including partial output if the
/// source failed part way through.
#[derive(Debug, Default)]
pub struct Extraction {
    pub results: Vec<LinearizationResult>,
    pub metrics: ExtractionMetrics,
    /// workflows that couldn't be linearized
    pub diagnostics: Diagnostics,
    /// set if the source itself failed; `results` holds everything before that
    pub interrupted: Option<anyhow::Error>,
}

/// Pulls workflows out of a source and linearizes each one.
#[derive(Debug)]
pub struct Extractor {
    linearizer: GraphLinearizer,
    batch_size: usize,
}

impl Extractor {
    pub fn new(policy: StartPolicy, batch_size: usize) -> Self {
        Self {
            linearizer: GraphLinearizer::new(policy),
            batch_size,
        }
    }

    /// Linearize every workflow in `source`.
    ///
    /// A malformed workflow is recorded in the diagnostics and skipped.
    /// A failing source stops the run, but never loses the results so far.
    pub fn run<S: WorkflowSource + ?Sized>(&self, source: &mut S) -> Extraction {
        let mut extraction = Extraction::default();

        for item in SourceBatches::new(source, self.batch_size) {
            let (workflow_id, raw_steps) = match item {
                Ok(item) => item,
                Err(e) => {
                    log::error!(
                        "extraction interrupted after {} workflows",
                        extraction.metrics.total_workflows
                    );
                    extraction.interrupted = Some(e);
                    break;
                }
            };

            extraction.metrics.total_workflows += 1;
            match StepGraph::from_raw(&workflow_id, raw_steps) {
                Ok(graph) => {
                    let result = self.linearizer.linearize(&workflow_id, &graph);
                    extraction.metrics.record(&result);
                    extraction.results.push(result);
                }
                Err(e) => {
                    extraction.metrics.failed_workflows += 1;
                    extraction
                        .diagnostics
                        .add_context(e.into(), format!("Skipping workflow {workflow_id}"));
                }
            }
        }

        extraction
    }
}
