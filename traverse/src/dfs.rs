use std::rc::Rc;

use colored::Colorize;

use util::{HashSet, Hasher};
use workflow::{LinearizationResult, StepGraph};

use crate::normalize_version;

const STACK_CAPACITY: usize = 32;

/// Step ids on the path from the root to a frame's step (exclusive).
/// Siblings share one allocation.
type PathSet<'a> = Rc<HashSet<&'a str>>;

struct Frame<'a> {
    step_id: &'a str,
    path: PathSet<'a>,
}

/// Depth-first search traversal strategy.
///
/// Uses an explicit stack instead of recursion, so workflow depth is never
/// bounded by the call stack. `visited` is global to the workflow; each frame
/// carries its own ancestor set, which is only used to spot back-edges.
pub struct DfsTraverser<'a> {
    /// workflow being traversed
    graph: &'a StepGraph,
    /// used internally to create the traversal
    stack: Vec<Frame<'a>>,
    /// steps already appended to the output
    visited: HashSet<&'a str>,
    /// result we build iteratively w/ calls to traverse()
    result: LinearizationResult,
}

impl<'a> DfsTraverser<'a> {
    /// Create a new DfsTraverser over `graph`.
    /// Tool-less steps are recorded up front, whether or not they get visited.
    pub fn new(workflow_id: &str, graph: &'a StepGraph) -> Self {
        let mut result = LinearizationResult::empty(workflow_id);
        result.steps.reserve(graph.len());
        result.steps_without_tools = graph
            .records()
            .filter(|r| r.is_tool_less())
            .map(|r| r.step_id.clone())
            .collect();

        Self {
            graph,
            stack: Vec::with_capacity(STACK_CAPACITY),
            visited: HashSet::with_capacity_and_hasher(graph.len(), Hasher::default()),
            result,
        }
    }

    /// Consume this struct and return the completed result.
    pub fn into_result(self) -> LinearizationResult {
        self.result
    }

    #[inline]
    pub fn is_visited(&self, step_id: &str) -> bool {
        self.visited.contains(step_id)
    }

    /// Traverse everything reachable from `roots`, which must be sorted ascending.
    pub fn traverse(&mut self, roots: &[&'a str]) {
        let empty: PathSet<'a> = Rc::default();
        for root in roots.iter().rev() {
            self.stack.push(Frame {
                step_id: *root,
                path: Rc::clone(&empty),
            });
        }
        while let Some(frame) = self.stack.pop() {
            self.handle(frame);
        }
    }

    /// Handle a single frame popped off the stack.
    fn handle(&mut self, frame: Frame<'a>) {
        let id = frame.step_id;

        if frame.path.contains(id) {
            log::debug!(
                "{}: back-edge to {}, pruning branch",
                self.result.workflow_id,
                id.yellow(),
            );
            self.result.cycles_detected.push(format!("Cycle involving {id}"));
            return;
        }
        if !self.visited.insert(id) {
            return;
        }

        log::trace!("{}: visiting {}", self.result.workflow_id, id.cyan());
        self.result.steps.push(id.to_owned());

        let graph = self.graph;
        let Some(record) = graph.get(id) else {
            return;
        };
        let mut metadata = record.clone();
        metadata.tool_version = Some(normalize_version(record.tool_version.as_deref()));
        self.result.steps_metadata.insert(id.to_owned(), metadata);

        let mut next: Vec<&'a str> = record.valid_next_steps().collect();
        if next.len() > 1 {
            self.result.branching_steps.insert(id.to_owned());
        }
        // descending, so the smallest id is popped first:
        next.sort_unstable_by(|a, b| b.cmp(a));

        let mut path: HashSet<&'a str> = (*frame.path).clone();
        path.insert(id);
        let path = Rc::new(path);

        for next_id in next {
            if graph.contains(next_id) {
                self.stack.push(Frame {
                    step_id: next_id,
                    path: Rc::clone(&path),
                });
            } else {
                self.result.missing_next_step.insert(next_id.to_owned());
            }
        }
    }
}
