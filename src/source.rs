//! Where raw workflow step graphs come from.
//!
//! A [`WorkflowSource`] hands out workflow ids page by page, and the raw,
//! unvalidated step maps for a page of ids. [`SourceBatches`] turns that into a
//! flat stream of `(workflow_id, raw_steps)`.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use util::HashMap;

use crate::fs::Fs;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Workflow export must be a JSON array or object")]
    UnsupportedLayout,
    #[error("Workflow entry {0} has no \"workflow_id\"")]
    MissingWorkflowId(usize),
    #[error("Workflow \"{0}\" appears more than once in the export")]
    DuplicateWorkflow(String),
}

/// A store of workflow step graphs that can be paged through.
pub trait WorkflowSource {
    /// Up to `limit` workflow ids in ascending order, after skipping the first `skip`.
    fn fetch_workflow_ids(&mut self, limit: usize, skip: usize) -> Result<Vec<String>>;

    /// Raw step maps for `ids`, keyed by workflow id.
    /// Workflows without any steps may be left out.
    fn fetch_batch(&mut self, ids: &[String]) -> Result<HashMap<String, Value>>;
}

/// Iterator over every workflow in a source, fetched `batch_size` at a time.
///
/// Yields `Value::Null` as the steps of a workflow the source had no steps for.
/// After the first error, the iterator is exhausted.
pub struct SourceBatches<'a, S: ?Sized> {
    source: &'a mut S,
    batch_size: usize,
    skip: usize,
    pending: VecDeque<(String, Value)>,
    done: bool,
}

impl<'a, S: WorkflowSource + ?Sized> SourceBatches<'a, S> {
    pub fn new(source: &'a mut S, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
            skip: 0,
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn fetch_next_batch(&mut self) -> Result<()> {
        let ids = self
            .source
            .fetch_workflow_ids(self.batch_size, self.skip)
            .with_context(|| format!("fetching workflow ids at offset {}", self.skip))?;
        if ids.is_empty() {
            self.done = true;
            return Ok(());
        }

        let mut batch = self
            .source
            .fetch_batch(&ids)
            .with_context(|| format!("fetching steps for batch at offset {}", self.skip))?;
        self.pending.extend(ids.into_iter().map(|id| {
            let steps = batch.remove(&id).unwrap_or(Value::Null);
            (id, steps)
        }));

        self.skip += self.batch_size;
        log::info!("fetched batch ending at offset {}", self.skip);
        Ok(())
    }
}

impl<S: WorkflowSource + ?Sized> Iterator for SourceBatches<'_, S> {
    type Item = Result<(String, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            if self.done {
                return None;
            }
            if let Err(e) = self.fetch_next_batch() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.pending.pop_front().map(Ok)
    }
}

/// A graph-store export loaded from a JSON file.
///
/// Two layouts are accepted: an array of `{"workflow_id": .., "steps": {..}}`
/// objects, or an object mapping workflow id to its steps.
#[derive(Debug, Default)]
pub struct JsonFileSource {
    workflows: BTreeMap<String, Value>,
}

impl JsonFileSource {
    pub fn load(fs: &Fs, path: &Path) -> Result<Self> {
        let mut strbuf = String::new();
        let value: Value = fs.read_json(path, &mut strbuf)?;
        let source = Self::from_value(value)
            .with_context(|| format!("while reading workflow export {path:?}"))?;
        log::info!("loaded {} workflows from {path:?}", source.len());
        Ok(source)
    }

    pub fn from_value(value: Value) -> Result<Self, Error> {
        let mut workflows = BTreeMap::new();
        match value {
            Value::Array(entries) => {
                for (i, entry) in entries.into_iter().enumerate() {
                    let Value::Object(mut entry) = entry else {
                        return Err(Error::MissingWorkflowId(i));
                    };
                    let id = match entry.remove("workflow_id") {
                        Some(Value::String(id)) => id,
                        Some(Value::Number(n)) => n.to_string(),
                        _ => return Err(Error::MissingWorkflowId(i)),
                    };
                    let steps = entry.remove("steps").unwrap_or(Value::Null);
                    if workflows.insert(id.clone(), steps).is_some() {
                        return Err(Error::DuplicateWorkflow(id));
                    }
                }
            }
            Value::Object(map) => workflows.extend(map),
            _ => return Err(Error::UnsupportedLayout),
        }
        Ok(Self { workflows })
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl WorkflowSource for JsonFileSource {
    fn fetch_workflow_ids(&mut self, limit: usize, skip: usize) -> Result<Vec<String>> {
        Ok(self.workflows.keys().skip(skip).take(limit).cloned().collect())
    }

    fn fetch_batch(&mut self, ids: &[String]) -> Result<HashMap<String, Value>> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.workflows
                    .get(id)
                    .filter(|steps| !steps.is_null())
                    .map(|steps| (id.clone(), steps.clone()))
            })
            .collect())
    }
}
