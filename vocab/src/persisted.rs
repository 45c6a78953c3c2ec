use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Vocabulary};

/// `{ "stoi": {token: index}, "itos": {index: token} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedVocab {
    stoi: BTreeMap<String, u32>,
    itos: BTreeMap<u32, String>,
}

impl From<Vocabulary> for PersistedVocab {
    fn from(vocab: Vocabulary) -> Self {
        let tokens = vocab.tokens();
        Self {
            stoi: tokens
                .iter()
                .enumerate()
                .map(|(i, t)| (t.clone(), i as u32))
                .collect(),
            itos: tokens
                .iter()
                .enumerate()
                .map(|(i, t)| (i as u32, t.clone()))
                .collect(),
        }
    }
}

impl PersistedVocab {
    /// Tokens in id order, once both maps are checked to agree.
    pub(crate) fn into_tokens(self) -> Result<Vec<String>, Error> {
        let PersistedVocab { stoi, itos } = self;

        let mut tokens = Vec::with_capacity(itos.len());
        for (expected, (idx, token)) in (0_u32..).zip(itos) {
            if idx != expected {
                return Err(Error::MissingIndex(expected));
            }
            if stoi.get(&token) != Some(&idx) {
                return Err(Error::Mismatch(token));
            }
            tokens.push(token);
        }
        if stoi.len() != tokens.len() {
            // some token in stoi points at an index itos doesn't have
            let orphan = stoi
                .into_iter()
                .find(|(_, idx)| *idx as usize >= tokens.len())
                .map(|(token, _)| token)
                .unwrap_or_default();
            return Err(Error::Mismatch(orphan));
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TokenId;
    use serde_json::json;
    use util::tokens::INPUT_DATA;

    fn round_trip(vocab: &Vocabulary, reserve_input_token: bool) -> Vocabulary {
        let text = serde_json::to_string(vocab).unwrap();
        let persisted: PersistedVocab = serde_json::from_str(&text).unwrap();
        Vocabulary::load(persisted, reserve_input_token).unwrap()
    }

    #[test]
    fn test_persisted_shape() -> Result<(), serde_json::Error> {
        let vocab = Vocabulary::build_from_sequences(&[vec!["tool1"]], false);
        let value = serde_json::to_value(&vocab)?;
        assert_eq!(
            value,
            json!({
                "stoi": {"<PAD>": 0, "<UNK>": 1, "tool1": 2},
                "itos": {"0": "<PAD>", "1": "<UNK>", "2": "tool1"},
            })
        );
        assert_eq!(round_trip(&vocab, false), vocab);
        Ok(())
    }

    #[test]
    fn test_round_trip_reserved_input() {
        let vocab = Vocabulary::build_from_sequences(&[vec!["a", "b"]], true);
        let loaded = round_trip(&vocab, true);
        assert_eq!(loaded, vocab);
        assert_eq!(loaded.num_reserved(), 3);
        assert_eq!(loaded.encode("b"), TokenId::from(4_u32));
    }

    #[test]
    fn test_round_trip_ordinary_input_token_at_2() {
        let vocab = Vocabulary::build_from_sequences(&[vec![INPUT_DATA, "x"]], false);
        let loaded = round_trip(&vocab, false);
        assert_eq!(loaded, vocab);
        assert_eq!(loaded.num_reserved(), 2);
        assert!(!loaded.is_reserved(TokenId::from(2_u32)));
    }

    #[test]
    fn test_reserved_input_must_be_at_2() {
        let vocab = Vocabulary::build_from_sequences(&[vec!["x", INPUT_DATA]], false);
        let persisted = PersistedVocab::from(vocab);
        assert_eq!(
            Vocabulary::load(persisted, true).unwrap_err(),
            Error::ReservedOutOfPlace {
                token: INPUT_DATA,
                expected: 2
            }
        );
    }

    fn load(value: serde_json::Value) -> Result<Vocabulary, Error> {
        let persisted: PersistedVocab = serde_json::from_value(value).unwrap();
        Vocabulary::load(persisted, false)
    }

    #[test]
    fn test_load_errors() {
        let gap = json!({
            "stoi": {"<PAD>": 0, "<UNK>": 1, "x": 3},
            "itos": {"0": "<PAD>", "1": "<UNK>", "3": "x"},
        });
        assert_eq!(load(gap).unwrap_err(), Error::MissingIndex(2));

        let mismatch = json!({
            "stoi": {"<PAD>": 0, "<UNK>": 1, "x": 1},
            "itos": {"0": "<PAD>", "1": "<UNK>", "2": "x"},
        });
        assert!(matches!(load(mismatch), Err(Error::Mismatch(_))));

        let orphan = json!({
            "stoi": {"<PAD>": 0, "<UNK>": 1, "y": 7},
            "itos": {"0": "<PAD>", "1": "<UNK>"},
        });
        assert_eq!(load(orphan).unwrap_err(), Error::Mismatch("y".into()));

        let misplaced = json!({
            "stoi": {"<UNK>": 0, "<PAD>": 1},
            "itos": {"0": "<UNK>", "1": "<PAD>"},
        });
        assert!(matches!(load(misplaced), Err(Error::ReservedOutOfPlace { .. })));
    }
}
