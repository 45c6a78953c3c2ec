use std::collections::BTreeSet;

use util::IdVec;
use vocab::{TokenId, Vocabulary};

use crate::TransitionGraph;

/// For each vocabulary token, the tokens that were never seen directly after it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NegativeCandidates {
    lists: IdVec<TokenId, Vec<TokenId>>,
}

impl NegativeCandidates {
    /// Candidate list for every token in `vocab`, ascending.
    ///
    /// With `exclude_reserved`, reserved tokens get an empty list and are never
    /// a candidate for anything else. A token followed by every other token
    /// falls back to "everything but itself".
    pub fn generate(graph: &TransitionGraph, vocab: &Vocabulary, exclude_reserved: bool) -> Self {
        let reserved: BTreeSet<TokenId> = if exclude_reserved {
            vocab.reserved_ids().collect()
        } else {
            BTreeSet::new()
        };

        let mut lists = IdVec::with_capacity(vocab.len());
        let mut degenerate = 0;
        for (id, token) in vocab.iter() {
            if reserved.contains(&id) {
                lists.push(Vec::new());
                continue;
            }

            let successors: BTreeSet<TokenId> =
                graph.successors(token).filter_map(|s| vocab.id(s)).collect();

            let mut candidates: Vec<TokenId> = vocab
                .ids()
                .filter(|c| *c != id && !successors.contains(c) && !reserved.contains(c))
                .collect();
            if candidates.is_empty() {
                degenerate += 1;
                candidates = vocab.ids().filter(|c| *c != id).collect();
            }
            lists.push(candidates);
        }

        if degenerate > 0 {
            log::debug!("{degenerate} tokens are followed by every other token");
        }
        Self { lists }
    }

    /// Candidates for `id`, or `None` if `id` isn't in the vocabulary these
    /// were generated from.
    pub fn for_token(&self, id: TokenId) -> Option<&[TokenId]> {
        self.lists.try_get(id).map(Vec::as_slice)
    }

    /// `(token, candidates)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &[TokenId])> {
        self.lists.enumerate().map(|(id, list)| (id, list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
