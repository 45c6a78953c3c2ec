use std::collections::BTreeMap;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use dataset::{
    split, ContextWindowBuilder, NegativeCandidates, Splits, TrainingExample, TransitionGraph,
};
use traverse::SequenceCleaner;
use vocab::Vocabulary;
use workflow::LinearizationResult;

use crate::settings::PrepareSettings;

/// Dataset for one partition.
#[derive(Debug)]
pub struct SplitDataset {
    pub name: &'static str,
    pub examples: Vec<TrainingExample>,
}

/// Sizes reported in `prepare_summary.json`.
#[derive(Debug, Default, Serialize)]
pub struct PrepareSummary {
    pub workflows: usize,
    /// non-empty cleaned sequences, before deduplication
    pub sequences: usize,
    pub vocab_size: usize,
    pub transitions: usize,
    pub context_len: usize,
    pub num_negatives: usize,
    pub seed: u64,
    /// split name -> (unique sequences, examples)
    pub splits: BTreeMap<&'static str, SplitSummary>,
}

#[derive(Debug, Default, Serialize)]
pub struct SplitSummary {
    pub sequences: usize,
    pub examples: usize,
}

/// Everything the prepare stage writes out.
#[derive(Debug)]
pub struct Prepared {
    pub vocab: Vocabulary,
    pub splits: Splits<String>,
    pub transitions: TransitionGraph,
    pub candidates: NegativeCandidates,
    /// non-empty splits only, in train/val/test order
    pub datasets: Vec<SplitDataset>,
    pub summary: PrepareSummary,
}

impl Prepared {
    /// `{"train": [[token, ..], ..], "val": .., "test": ..}`
    pub fn splits_json(&self) -> BTreeMap<&'static str, &[Vec<String>]> {
        self.splits.named().into_iter().collect()
    }
}

/// Turn linearized workflows into a vocabulary, deterministic splits and
/// context-window datasets.
pub fn prepare(results: &[LinearizationResult], settings: &PrepareSettings) -> Result<Prepared> {
    let cleaner = SequenceCleaner::new(settings.skip_input_steps);
    let sequences: Vec<Vec<String>> = results
        .iter()
        .map(|r| cleaner.clean(r))
        .filter(|seq| !seq.is_empty())
        .collect();
    log::info!(
        "cleaned {} non-empty sequences from {} workflows",
        sequences.len(),
        results.len()
    );

    let vocab = Vocabulary::build_from_sequences(&sequences, settings.reserve_input_token);
    let splits = split(
        &sequences,
        settings.test_fraction,
        settings.val_fraction,
        settings.seed,
    )?;

    // validation and test transitions stay out of the negatives unless asked for:
    let transitions = if settings.negatives_from_corpus {
        TransitionGraph::build(&sequences)
    } else {
        TransitionGraph::build(&splits.train)
    };
    let candidates = NegativeCandidates::generate(&transitions, &vocab, true);

    let builder = ContextWindowBuilder::new(settings.context_len, settings.num_negatives)?;
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let mut summary = PrepareSummary {
        workflows: results.len(),
        sequences: sequences.len(),
        vocab_size: vocab.len(),
        transitions: transitions.edge_count(),
        context_len: settings.context_len,
        num_negatives: settings.num_negatives,
        seed: settings.seed,
        splits: BTreeMap::new(),
    };

    let mut datasets = Vec::with_capacity(3);
    for (name, part) in splits.named() {
        if part.is_empty() {
            log::info!("{name} split is empty; skipping");
            continue;
        }
        let examples = builder.build(part, &vocab, Some(&candidates), &mut rng);
        log::info!("{name}: {} sequences, {} examples", part.len(), examples.len());
        summary.splits.insert(
            name,
            SplitSummary {
                sequences: part.len(),
                examples: examples.len(),
            },
        );
        datasets.push(SplitDataset { name, examples });
    }

    Ok(Prepared {
        vocab,
        splits,
        transitions,
        candidates,
        datasets,
        summary,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;
    use workflow::{StepGraph, StepRecord};

    fn settings() -> PrepareSettings {
        PrepareSettings {
            input: PathBuf::from("unused"),
            context_len: 3,
            num_negatives: 2,
            test_fraction: 0.0,
            val_fraction: 0.0,
            seed: 42,
            reserve_input_token: true,
            skip_input_steps: false,
            negatives_from_corpus: false,
        }
    }

    fn chain(workflow_id: &str, tools: &[&str]) -> LinearizationResult {
        let records = tools.iter().enumerate().map(|(i, tool)| {
            let record = StepRecord::new(i.to_string()).with_tool(*tool);
            if i + 1 < tools.len() {
                record.with_next([(i + 1).to_string()])
            } else {
                record
            }
        });
        let graph = StepGraph::from_records(workflow_id, records).unwrap();
        traverse::GraphLinearizer::default().linearize(workflow_id, &graph)
    }

    #[test]
    fn test_prepare_all_train() -> Result<()> {
        let results = vec![
            chain("wf1", &["a", "b", "c"]),
            chain("wf2", &["a", "c"]),
            LinearizationResult::empty("wf3"),
        ];
        let prepared = prepare(&results, &settings())?;

        assert_eq!(prepared.summary.workflows, 3);
        assert_eq!(prepared.summary.sequences, 2);
        // <PAD> <UNK> <INPUT_DATA> a b c
        assert_eq!(prepared.vocab.len(), 6);
        assert_eq!(prepared.splits.train.len(), 2);

        assert_eq!(prepared.datasets.len(), 1);
        let train = &prepared.datasets[0];
        assert_eq!(train.name, "train");
        assert_eq!(train.examples.len(), 3);
        for example in &train.examples {
            assert_eq!(example.context.len(), 3);
            assert_eq!(example.negatives.len(), 2);
        }
        assert!(prepared.transitions.has_edge("a", "b"));
        assert!(prepared.transitions.has_edge("a", "c"));
        Ok(())
    }

    #[test]
    fn test_negatives_only_from_train_split() -> Result<()> {
        let results: Vec<_> = (0..10)
            .map(|i| chain(&format!("wf{i}"), &[&format!("t{i}"), &format!("u{i}")]))
            .collect();
        let mut settings = settings();
        settings.test_fraction = 0.5;
        let prepared = prepare(&results, &settings)?;

        assert_eq!(prepared.splits.test.len(), 5);
        assert_eq!(prepared.transitions.edge_count(), 5);
        for seq in &prepared.splits.test {
            assert!(!prepared.transitions.has_edge(&seq[0], &seq[1]));
        }

        settings.negatives_from_corpus = true;
        let prepared = prepare(&results, &settings)?;
        assert_eq!(prepared.transitions.edge_count(), 10);
        Ok(())
    }
}
