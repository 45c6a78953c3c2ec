use util::{HashSet, Hasher};
use workflow::{LinearizationResult, StepGraph};

use crate::dfs::DfsTraverser;

/// How to choose traversal roots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Roots are the steps without incoming edges. If there are none,
    /// the single smallest step id is used. Cyclic components that no root
    /// reaches are left out of the result.
    SmallestIdFallback,
    /// Like `SmallestIdFallback`, then keep starting new traversals from the
    /// smallest unvisited step id until every step has been visited.
    #[default]
    EveryComponent,
}

/// Produces a deterministic step order for one workflow.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphLinearizer {
    policy: StartPolicy,
}

impl GraphLinearizer {
    pub fn new(policy: StartPolicy) -> Self {
        Self { policy }
    }

    /// Order the steps of `graph`. Never fails: dangling edges, cycles and
    /// tool-less steps are all recorded on the result instead.
    pub fn linearize(&self, workflow_id: &str, graph: &StepGraph) -> LinearizationResult {
        if graph.is_empty() {
            log::debug!("{workflow_id}: empty workflow");
            return LinearizationResult::empty(workflow_id);
        }

        let roots = start_steps(graph);
        log::trace!("{workflow_id}: starting from {roots:?}");

        let mut traverser = DfsTraverser::new(workflow_id, graph);
        traverser.traverse(&roots);

        if self.policy == StartPolicy::EveryComponent {
            let mut remaining: Vec<&str> = graph
                .step_ids()
                .filter(|id| !traverser.is_visited(id))
                .collect();
            remaining.sort_unstable();
            for id in remaining {
                if !traverser.is_visited(id) {
                    log::debug!("{workflow_id}: {id} unreachable from roots, traversing from it");
                    traverser.traverse(&[id]);
                }
            }
        }

        let result = traverser.into_result();
        log::debug!(
            "{workflow_id}: {} of {} steps ordered, {} branching, {} cycles",
            result.steps.len(),
            graph.len(),
            result.branching_steps.len(),
            result.cycles_detected.len(),
        );
        result
    }
}

/// Steps that are not the target of any edge, ascending.
/// Falls back to the smallest step id when every step has an incoming edge.
fn start_steps(graph: &StepGraph) -> Vec<&str> {
    let mut targets: HashSet<&str> = HashSet::with_capacity_and_hasher(graph.len(), Hasher::default());
    for record in graph.records() {
        targets.extend(record.valid_next_steps());
    }

    let mut roots: Vec<&str> = graph.step_ids().filter(|id| !targets.contains(id)).collect();
    if roots.is_empty() {
        roots.extend(graph.step_ids().min());
    }
    roots.sort_unstable();
    roots
}
