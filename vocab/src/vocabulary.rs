use hashbrown::hash_map::{EntryRef, HashMap};
use serde::Serialize;

use util::tokens::{INPUT_DATA, PAD, UNK};
use util::{Hasher, IdVec};

use crate::persisted::PersistedVocab;
use crate::{TokenId, PAD_ID, UNK_ID};

/// Token <-> id table.
///
/// Ids are dense: the `n` tokens in a vocabulary have ids `0..n`.
/// Tokens are never removed.
///
/// Serializes as a [`PersistedVocab`]. The persisted form doesn't say whether
/// `<INPUT_DATA>` was reserved, so loading goes through [`Vocabulary::load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "PersistedVocab")]
pub struct Vocabulary {
    stoi: HashMap<String, TokenId, Hasher>,
    itos: IdVec<TokenId, String>,
    /// reserved tokens occupy ids `0..num_reserved`
    num_reserved: usize,
}

impl Vocabulary {
    /// Create a vocabulary holding only the reserved tokens.
    /// `<INPUT_DATA>` is reserved if `reserve_input_token` is true; otherwise it
    /// becomes an ordinary token if it is ever added.
    pub fn new(reserve_input_token: bool) -> Self {
        let reserved: &[&str] = if reserve_input_token {
            &[PAD, UNK, INPUT_DATA]
        } else {
            &[PAD, UNK]
        };
        let mut vocab = Self {
            stoi: HashMap::with_capacity_and_hasher(reserved.len(), Hasher::default()),
            itos: IdVec::with_capacity(reserved.len()),
            num_reserved: reserved.len(),
        };
        for token in reserved {
            vocab.add_token(token);
        }
        vocab
    }

    /// Build a vocabulary from every token in `sequences`, numbered in the
    /// order they are first seen.
    pub fn build_from_sequences<S: AsRef<str>>(
        sequences: &[Vec<S>],
        reserve_input_token: bool,
    ) -> Self {
        let mut vocab = Self::new(reserve_input_token);
        for sequence in sequences {
            for token in sequence {
                vocab.add_token(token.as_ref());
            }
        }
        log::debug!("built vocabulary of {} tokens", vocab.len());
        vocab
    }

    /// Add `token` if it's new, and return its id either way.
    pub fn add_token(&mut self, token: &str) -> TokenId {
        match self.stoi.entry_ref(token) {
            EntryRef::Occupied(entry) => *entry.get(),
            EntryRef::Vacant(entry) => {
                let id = self.itos.push(token.to_owned());
                entry.insert(id);
                id
            }
        }
    }

    /// Id of `token`, if it's in the vocabulary.
    #[inline]
    pub fn id(&self, token: &str) -> Option<TokenId> {
        self.stoi.get(token).copied()
    }

    /// Id of `token`, or the `<UNK>` id if it isn't in the vocabulary.
    #[inline]
    pub fn encode(&self, token: &str) -> TokenId {
        self.id(token).unwrap_or(UNK_ID)
    }

    pub fn encode_all<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<TokenId> {
        tokens.iter().map(|t| self.encode(t.as_ref())).collect()
    }

    /// Token with id `id`, if there is one.
    #[inline]
    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.itos.try_get(id).map(String::as_str)
    }

    #[inline]
    pub fn pad(&self) -> TokenId {
        PAD_ID
    }

    #[inline]
    pub fn unk(&self) -> TokenId {
        UNK_ID
    }

    #[inline]
    pub fn is_reserved(&self, id: TokenId) -> bool {
        usize::from(id) < self.num_reserved
    }

    pub fn reserved_ids(&self) -> impl Iterator<Item = TokenId> {
        (0..self.num_reserved).map(TokenId::from)
    }

    #[inline]
    pub fn num_reserved(&self) -> usize {
        self.num_reserved
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.itos.len()
    }

    /// Always false: reserved tokens are present from the start.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    /// All ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> {
        self.itos.ids()
    }

    /// `(id, token)` pairs, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.itos.enumerate().map(|(id, token)| (id, token.as_str()))
    }

    /// Rebuild a vocabulary from its persisted form. `reserve_input_token` must
    /// match the value the vocabulary was built with.
    pub fn load(
        persisted: PersistedVocab,
        reserve_input_token: bool,
    ) -> Result<Self, crate::Error> {
        Self::from_tokens(persisted.into_tokens()?, reserve_input_token)
    }

    /// Rebuild from tokens in id order. Fails on repeated tokens or on reserved
    /// tokens that aren't at their fixed ids.
    fn from_tokens(tokens: Vec<String>, reserve_input_token: bool) -> Result<Self, crate::Error> {
        let reserved_at = |idx: usize, token: &'static str| -> Result<(), crate::Error> {
            if tokens.get(idx).map(String::as_str) == Some(token) {
                Ok(())
            } else {
                Err(crate::Error::ReservedOutOfPlace {
                    token,
                    expected: idx as u32,
                })
            }
        };
        reserved_at(0, PAD)?;
        reserved_at(1, UNK)?;
        let num_reserved = if reserve_input_token {
            reserved_at(2, INPUT_DATA)?;
            3
        } else {
            2
        };

        let mut stoi = HashMap::with_capacity_and_hasher(tokens.len(), Hasher::default());
        for (i, token) in tokens.iter().enumerate() {
            if stoi.insert(token.clone(), TokenId::from(i)).is_some() {
                return Err(crate::Error::DuplicateToken(token.clone()));
            }
        }

        Ok(Self {
            stoi,
            itos: tokens.into(),
            num_reserved,
        })
    }

    pub(crate) fn tokens(&self) -> &[String] {
        self.itos.as_slice()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::INPUT_DATA_ID;

    #[test]
    fn test_reserved() {
        let vocab = Vocabulary::new(true);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.id(PAD), Some(PAD_ID));
        assert_eq!(vocab.id(UNK), Some(UNK_ID));
        assert_eq!(vocab.id(INPUT_DATA), Some(INPUT_DATA_ID));
        assert!(vocab.is_reserved(INPUT_DATA_ID));

        let vocab = Vocabulary::new(false);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.reserved_ids().collect::<Vec<_>>(), vec![PAD_ID, UNK_ID]);
    }

    #[test]
    fn test_add_and_encode() {
        let mut vocab = Vocabulary::new(false);
        let id = vocab.add_token("tool1");
        assert_eq!(id, TokenId::from(2_u32));
        assert_eq!(vocab.add_token("tool1"), id);
        assert_eq!(vocab.encode("tool1"), id);
        assert_eq!(vocab.encode("unknown_tool"), UNK_ID);
        assert_eq!(vocab.token(id), Some("tool1"));
        assert!(!vocab.is_reserved(id));
        assert_eq!(vocab.token(TokenId::from(99_u32)), None);
    }

    #[test]
    fn test_build_first_seen_order() {
        let sequences = vec![vec!["b", "a"], vec![INPUT_DATA, "c", "a"]];
        let vocab = Vocabulary::build_from_sequences(&sequences, true);
        let tokens: Vec<&str> = vocab.iter().map(|(_, t)| t).collect();
        assert_eq!(tokens, vec![PAD, UNK, INPUT_DATA, "b", "a", "c"]);
        assert_eq!(
            vocab.encode_all(&["a", "zzz"]),
            vec![TokenId::from(4_u32), UNK_ID]
        );
    }

    #[test]
    fn test_input_token_unreserved() {
        let vocab = Vocabulary::build_from_sequences(&[vec![INPUT_DATA, "x"]], false);
        let id = vocab.encode(INPUT_DATA);
        assert_eq!(id, TokenId::from(2_u32));
        assert!(!vocab.is_reserved(id));
    }
}
