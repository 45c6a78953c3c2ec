//! Everything between cleaned tool sequences and training examples:
//! observed transitions, negative candidates, context windows, and a
//! deterministic train/validation/test split.
//!
//! Nothing in this crate seeds its own randomness; callers pass in an rng
//! (or a seed) so that the same inputs always give the same dataset.

/// observed token adjacencies
mod transitions;
pub use transitions::TransitionGraph;

/// per-token lists of never-observed successors
mod negatives;
pub use negatives::NegativeCandidates;

/// sliding context windows
mod windows;
pub use windows::{ContextWindowBuilder, TrainingExample};

/// deterministic partitioning
mod split;
pub use split::{split, Splits};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error(
        "Split fractions must each be within [0, 1] and sum to at most 1 \
         (got test={test}, val={val})"
    )]
    InvalidFractions { test: f64, val: f64 },
    #[error("Context length must be at least 1")]
    ZeroContextLength,
}
