//! Bidirectional mapping between tool tokens and dense integer ids.
//!
//! Reserved tokens always come first: `<PAD>` is 0, `<UNK>` is 1, and
//! `<INPUT_DATA>` is 2 when it is reserved. Other tokens are numbered in the
//! order they were first added.

/// typed token ids
mod id;
pub use id::{TokenId, INPUT_DATA_ID, PAD_ID, UNK_ID};

/// the vocabulary itself
mod vocabulary;
pub use vocabulary::Vocabulary;

/// on-disk `{stoi, itos}` form
mod persisted;
pub use persisted::PersistedVocab;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Vocabulary has no token with index {0}; indices must be contiguous from 0")]
    MissingIndex(u32),
    #[error("Token \"{0}\" appears under more than one index")]
    DuplicateToken(String),
    #[error("\"stoi\" and \"itos\" disagree about token \"{0}\"")]
    Mismatch(String),
    #[error("Reserved token {token} must have index {expected}")]
    ReservedOutOfPlace { token: &'static str, expected: u32 },
}
