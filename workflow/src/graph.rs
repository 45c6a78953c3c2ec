use serde_json::{Map, Value};

use util::{HashMap, Hasher};

use crate::step::RawStep;
use crate::{Error, StepRecord};

/// All steps of a single workflow, keyed by step id.
///
/// Keys are unique. Edges are not checked: a `next_steps` entry may point
/// to a step that isn't in the graph.
#[derive(Debug, Default, Clone)]
pub struct StepGraph {
    steps: HashMap<String, StepRecord>,
}

impl StepGraph {
    /// Build a graph from typed records. A repeated step id is a malformed record.
    pub fn from_records<I>(workflow_id: &str, records: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = StepRecord>,
    {
        let records = records.into_iter();
        let mut steps =
            HashMap::with_capacity_and_hasher(records.size_hint().0, Hasher::default());
        for record in records {
            if steps.contains_key(&record.step_id) {
                return Err(Error::malformed(
                    workflow_id,
                    &record.step_id,
                    "duplicate step id",
                ));
            }
            steps.insert(record.step_id.clone(), record);
        }
        Ok(Self { steps })
    }

    /// Validate a raw `{ step_id: {..} }` object into a typed graph.
    ///
    /// Fails on the first step that is not an object, has fields of the wrong type,
    /// lacks a `step_id`, or whose `step_id` disagrees with its key.
    pub fn from_raw(workflow_id: &str, raw: Value) -> Result<Self, Error> {
        let raw = match raw {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(Error::MalformedSteps(workflow_id.to_owned())),
        };

        let mut steps = HashMap::with_capacity_and_hasher(raw.len(), Hasher::default());
        for (key, value) in raw {
            let raw_step: RawStep = serde_json::from_value(value)
                .map_err(|e| Error::malformed(workflow_id, &key, e))?;
            match raw_step.step_id.as_deref() {
                None => return Err(Error::malformed(workflow_id, &key, "missing step_id")),
                Some(id) if id != key => {
                    return Err(Error::malformed(
                        workflow_id,
                        &key,
                        format!("step_id \"{id}\" does not match its key"),
                    ));
                }
                Some(_) => (),
            }
            let record = raw_step.into_record(key.clone());
            steps.insert(key, record);
        }

        log::trace!("validated {} steps for workflow {workflow_id}", steps.len());
        Ok(Self { steps })
    }

    #[inline]
    pub fn get(&self, step_id: &str) -> Option<&StepRecord> {
        self.steps.get(step_id)
    }

    #[inline]
    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over step ids in arbitrary order.
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Iterate over records in arbitrary order.
    pub fn records(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw() -> Result<(), Error> {
        let raw = json!({
            "1": {"step_id": "1", "name": "Start", "tool_id": "tool1", "next_steps": ["2", null]},
            "2": {"step_id": "2", "tool_id": null, "next_step_ids": []},
        });
        let graph = StepGraph::from_raw("wf1", raw)?;
        assert_eq!(graph.len(), 2);
        let first = graph.get("1").unwrap();
        assert_eq!(first.tool_name.as_deref(), Some("Start"));
        assert_eq!(first.next_steps, vec!["2".to_owned()]);
        assert!(graph.get("2").unwrap().is_tool_less());
        Ok(())
    }

    #[test]
    fn test_null_steps_is_empty_graph() -> Result<(), Error> {
        assert!(StepGraph::from_raw("wf", Value::Null)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_step_id_is_malformed() {
        let raw = json!({"1": {"tool_id": "t"}});
        let err = StepGraph::from_raw("wf", raw).unwrap_err();
        assert!(matches!(err, Error::MalformedStepRecord { ref step_id, .. } if step_id == "1"));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let raw = json!({"1": {"step_id": "1", "next_steps": "2"}});
        assert!(matches!(
            StepGraph::from_raw("wf", raw),
            Err(Error::MalformedStepRecord { .. })
        ));
        let raw = json!({"1": 5});
        assert!(StepGraph::from_raw("wf", raw).is_err());
    }

    #[test]
    fn test_key_mismatch_is_malformed() {
        let raw = json!({"1": {"step_id": "2"}});
        assert!(StepGraph::from_raw("wf", raw).is_err());
    }

    #[test]
    fn test_non_object_steps() {
        assert!(matches!(
            StepGraph::from_raw("wf", json!([1, 2])),
            Err(Error::MalformedSteps(_))
        ));
    }

    #[test]
    fn test_duplicate_records() {
        let records = vec![StepRecord::new("a"), StepRecord::new("a")];
        assert!(StepGraph::from_records("wf", records).is_err());
    }
}
