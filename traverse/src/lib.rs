//!
//! The functions in this mod turn the steps of a single workflow into an ordered
//! list of tool tokens.
//!
//! A workflow is ordered in up to 3 steps:
//! 1. Perform an iterative DFS from the start steps, recording branching steps,
//!    missing targets, tool-less steps and pruned back-edges as it goes.
//! 2. If any step branches, re-order the visited steps with Kahn's algorithm,
//!    always taking the smallest ready step id.
//! 3. Map each step to a canonical tool token.
//!
//! Every stage is deterministic for a fixed input graph; nothing here reads
//! a clock or a random number generator.

/// iterative depth-first traversal of a step graph
mod dfs;

/// entry point for linearizing a whole workflow
mod linearizer;
pub use linearizer::{GraphLinearizer, StartPolicy};

/// Kahn's algorithm with smallest-id tie-breaking
mod topo;
pub use topo::resolve;

/// canonical tool tokens
mod normalize;
pub use normalize::{normalize, normalize_version, UNKNOWN_VERSION};

/// linearization result -> tool token sequence
mod cleaner;
pub use cleaner::SequenceCleaner;
