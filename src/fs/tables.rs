//! Tab-separated tables written by the extract and prepare stages.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;

use dataset::{TrainingExample, TransitionGraph};
use workflow::{LinearizationResult, SummaryRow};

use super::Fs;

impl Fs {
    /// One summary row per workflow, with a header line.
    pub fn write_summary_tsv(
        &self,
        path: &Path,
        results: &[LinearizationResult],
        strbuf: &mut String,
    ) -> Result<()> {
        strbuf.clear();
        strbuf.push_str(&SummaryRow::HEADERS.join("\t"));
        strbuf.push('\n');
        for result in results {
            result.summary().write_tsv(strbuf);
        }
        self.write_file(path, strbuf)
    }

    /// One `from\tto` line per transition edge, sorted.
    pub fn write_transitions_tsv(
        &self,
        path: &Path,
        graph: &TransitionGraph,
        strbuf: &mut String,
    ) -> Result<()> {
        strbuf.clear();
        strbuf.push_str("from\tto\n");
        for (from, to) in graph.edges() {
            strbuf.push_str(from);
            strbuf.push('\t');
            strbuf.push_str(to);
            strbuf.push('\n');
        }
        self.write_file(path, strbuf)
    }

    /// `context_0..context_{L-1}`, `target`, then `neg_0..neg_{K-1}` if there are negatives.
    pub fn write_dataset_tsv(
        &self,
        path: &Path,
        examples: &[TrainingExample],
        context_len: usize,
        strbuf: &mut String,
    ) -> Result<()> {
        strbuf.clear();
        dataset_table(examples, context_len, strbuf);
        self.write_file(path, strbuf)
    }
}

fn dataset_table(examples: &[TrainingExample], context_len: usize, buf: &mut String) {
    let num_negatives = examples.first().map_or(0, |e| e.negatives.len());

    let mut header: Vec<String> = (0..context_len).map(|i| format!("context_{i}")).collect();
    header.push("target".to_owned());
    header.extend((0..num_negatives).map(|i| format!("neg_{i}")));
    buf.push_str(&header.join("\t"));
    buf.push('\n');

    for example in examples {
        let ids = example
            .context
            .iter()
            .chain(std::iter::once(&example.target))
            .chain(&example.negatives);
        for (i, id) in ids.enumerate() {
            if i > 0 {
                buf.push('\t');
            }
            // writing to a String can't fail
            let _ = write!(buf, "{id}");
        }
        buf.push('\n');
    }
}
