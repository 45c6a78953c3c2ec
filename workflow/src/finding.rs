use std::fmt;

/// Non-fatal conditions recorded on a [`crate::LinearizationResult`].
/// None of these interrupt processing; they are tallied per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Finding {
    /// an edge references a step id that isn't in the workflow
    MissingTargetStep,
    /// a back-edge on the current path was pruned
    CycleDetected,
    /// a step has no tool id
    ToolMissing,
    /// the workflow has no steps at all
    EmptyGraph,
}

impl fmt::Display for Finding {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingTargetStep => "missing next step",
            Self::CycleDetected     => "cycle detected",
            Self::ToolMissing       => "step without tool",
            Self::EmptyGraph        => "empty workflow",
        };
        f.write_str(label)
    }
}
