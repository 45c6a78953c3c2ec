use util::tokens::{INPUT_DATA, UNK};
use workflow::LinearizationResult;

use crate::{normalize, resolve};

/// Turns a [`LinearizationResult`] into a sequence of canonical tool tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceCleaner {
    /// drop `<INPUT_DATA>` tokens from the output
    skip_input_steps: bool,
}

impl SequenceCleaner {
    pub fn new(skip_input_steps: bool) -> Self {
        Self { skip_input_steps }
    }

    /// Branching workflows are re-ordered topologically first; linear ones keep
    /// the traversal order. Steps without metadata become `<UNK>`.
    pub fn clean(&self, result: &LinearizationResult) -> Vec<String> {
        let order = if result.is_branching() {
            resolve(&result.steps_metadata)
        } else {
            result.steps.clone()
        };

        let mut tokens = Vec::with_capacity(order.len());
        for step_id in &order {
            let token = match result.steps_metadata.get(step_id) {
                Some(record) => normalize(record.tool_id.as_deref(), record.tool_name.as_deref()),
                None => {
                    log::trace!("{}: no metadata for step {step_id}", result.workflow_id);
                    UNK.to_owned()
                }
            };
            if self.skip_input_steps && token == INPUT_DATA {
                continue;
            }
            tokens.push(token);
        }
        tokens
    }
}
