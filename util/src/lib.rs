mod id_vec;
pub use id_vec::IdVec;

mod timer;
pub use timer::Timer;

/// Names of tokens with special meaning in tool sequences and vocabularies.
pub mod tokens {
    /// Left-padding for context windows.
    pub const PAD: &str = "<PAD>";
    /// Stand-in for tokens missing from a vocabulary.
    pub const UNK: &str = "<UNK>";
    /// A workflow input slot with no executable tool.
    pub const INPUT_DATA: &str = "<INPUT_DATA>";
}

#[derive(thiserror::Error, Debug)]
#[error("Filesystem path is not valid UTF-8")]
pub struct PathEncodingError;

pub type Hasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub type HashMap<K, V> = std::collections::HashMap<K, V, Hasher>;
pub type HashSet<T> = std::collections::HashSet<T, Hasher>;
