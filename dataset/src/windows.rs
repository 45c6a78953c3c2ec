use rand::seq::IndexedRandom;
use rand::Rng;

use vocab::{TokenId, Vocabulary};

use crate::{Error, NegativeCandidates};

/// One (context -> target) pair, plus tokens that should *not* follow the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    /// exactly `context_len` ids, left-padded with `<PAD>`
    pub context: Vec<TokenId>,
    pub target: TokenId,
    /// `num_negatives` ids, or none if no candidate source was given
    pub negatives: Vec<TokenId>,
}

/// Slides a fixed-length window over encoded sequences.
#[derive(Debug, Clone, Copy)]
pub struct ContextWindowBuilder {
    context_len: usize,
    num_negatives: usize,
}

impl ContextWindowBuilder {
    pub fn new(context_len: usize, num_negatives: usize) -> Result<Self, Error> {
        if context_len == 0 {
            return Err(Error::ZeroContextLength);
        }
        Ok(Self {
            context_len,
            num_negatives,
        })
    }

    /// One example per position `1..len` of every sequence.
    ///
    /// Negatives are drawn with replacement from the candidates of the token just
    /// before the target. Tokens with no candidates draw uniformly from the
    /// whole vocabulary. Without `candidates`, every example has no negatives.
    pub fn build<S, R>(
        &self,
        sequences: &[Vec<S>],
        vocab: &Vocabulary,
        candidates: Option<&NegativeCandidates>,
        rng: &mut R,
    ) -> Vec<TrainingExample>
    where
        S: AsRef<str>,
        R: Rng,
    {
        let pad = vocab.pad();
        let mut examples = Vec::new();

        for sequence in sequences {
            let ids = vocab.encode_all(sequence);
            for i in 1..ids.len() {
                let history = &ids[i.saturating_sub(self.context_len)..i];
                let mut context = Vec::with_capacity(self.context_len);
                context.resize(self.context_len - history.len(), pad);
                context.extend_from_slice(history);

                let negatives = match candidates {
                    Some(source) => self.draw_negatives(ids[i - 1], vocab, source, rng),
                    None => Vec::new(),
                };

                examples.push(TrainingExample {
                    context,
                    target: ids[i],
                    negatives,
                });
            }
        }

        log::debug!(
            "{} examples from {} sequences",
            examples.len(),
            sequences.len()
        );
        examples
    }

    fn draw_negatives<R: Rng>(
        &self,
        current: TokenId,
        vocab: &Vocabulary,
        source: &NegativeCandidates,
        rng: &mut R,
    ) -> Vec<TokenId> {
        let pool = source.for_token(current).unwrap_or_default();
        let mut negatives = Vec::with_capacity(self.num_negatives);
        for _ in 0..self.num_negatives {
            let id = match pool.choose(rng) {
                Some(id) => *id,
                None => TokenId::from(rng.random_range(0..vocab.len())),
            };
            negatives.push(id);
        }
        negatives
    }
}
