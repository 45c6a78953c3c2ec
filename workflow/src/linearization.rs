use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Finding, StepRecord};

/// Ordered steps of one workflow, plus everything noticed while ordering them.
///
/// Sets and maps are ordered collections so that serializing the same result
/// twice produces identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearizationResult {
    pub workflow_id: String,
    /// visited step ids, each at most once
    pub steps: Vec<String>,
    /// records of the visited steps only
    #[serde(default)]
    pub steps_metadata: BTreeMap<String, StepRecord>,
    /// steps with more than one non-empty outgoing reference
    #[serde(default)]
    pub branching_steps: BTreeSet<String>,
    /// referenced step ids that aren't in the graph
    #[serde(default)]
    pub missing_next_step: BTreeSet<String>,
    /// steps with no tool id, reachable or not
    #[serde(default)]
    pub steps_without_tools: BTreeSet<String>,
    /// one marker per pruned back-edge
    #[serde(default)]
    pub cycles_detected: Vec<String>,
}

impl LinearizationResult {
    /// Result for a workflow with no steps.
    pub fn empty(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            steps: Vec::new(),
            steps_metadata: BTreeMap::new(),
            branching_steps: BTreeSet::new(),
            missing_next_step: BTreeSet::new(),
            steps_without_tools: BTreeSet::new(),
            cycles_detected: Vec::new(),
        }
    }

    #[inline]
    pub fn is_branching(&self) -> bool {
        !self.branching_steps.is_empty()
    }

    /// Non-fatal findings present in this result, in a fixed order.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::with_capacity(4);
        if self.steps.is_empty() {
            findings.push(Finding::EmptyGraph);
        }
        if !self.missing_next_step.is_empty() {
            findings.push(Finding::MissingTargetStep);
        }
        if !self.cycles_detected.is_empty() {
            findings.push(Finding::CycleDetected);
        }
        if !self.steps_without_tools.is_empty() {
            findings.push(Finding::ToolMissing);
        }
        findings
    }

    /// Number of step ids that appear more than once in `steps`.
    /// Always zero for results produced by the linearizer.
    pub fn duplicate_step_count(&self) -> usize {
        let unique: BTreeSet<&str> = self.steps.iter().map(String::as_str).collect();
        self.steps.len() - unique.len()
    }

    pub fn summary(&self) -> SummaryRow {
        SummaryRow {
            workflow_id: self.workflow_id.clone(),
            steps_count: self.steps.len(),
            branching_count: self.branching_steps.len(),
            missing_next_count: self.missing_next_step.len(),
            no_tool_count: self.steps_without_tools.len(),
            cycle_count: self.cycles_detected.len(),
        }
    }
}

/// One row of the per-workflow summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub workflow_id: String,
    pub steps_count: usize,
    pub branching_count: usize,
    pub missing_next_count: usize,
    pub no_tool_count: usize,
    pub cycle_count: usize,
}

impl SummaryRow {
    pub const HEADERS: [&'static str; 6] = [
        "workflow_id",
        "steps_count",
        "branching_count",
        "missing_next_count",
        "no_tool_count",
        "cycle_count",
    ];

    /// Append this row to `buf` as one tab-separated line.
    pub fn write_tsv(&self, buf: &mut String) {
        use std::fmt::Write;
        // writing to a String can't fail
        let _ = writeln!(
            buf,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.workflow_id,
            self.steps_count,
            self.branching_count,
            self.missing_next_count,
            self.no_tool_count,
            self.cycle_count,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_findings() {
        let result = LinearizationResult::empty("wf");
        assert_eq!(result.findings(), vec![Finding::EmptyGraph]);
        assert!(!result.is_branching());
    }

    #[test]
    fn test_summary_tsv() {
        let mut result = LinearizationResult::empty("wf7");
        result.steps = vec!["1".into(), "2".into()];
        result.cycles_detected.push("Cycle involving 1".into());
        result.missing_next_step.insert("9".into());

        let mut buf = String::new();
        result.summary().write_tsv(&mut buf);
        assert_eq!(buf, "wf7\t2\t0\t1\t0\t1\n");
        assert_eq!(
            result.findings(),
            vec![Finding::MissingTargetStep, Finding::CycleDetected]
        );
    }

    #[test]
    fn test_serialized_shape() -> Result<(), serde_json::Error> {
        let mut result = LinearizationResult::empty("wf");
        result.steps.push("1".into());
        result
            .steps_metadata
            .insert("1".into(), StepRecord::new("1").with_next(["2"]));
        let value = serde_json::to_value(&result)?;
        assert_eq!(value["steps_metadata"]["1"]["tool_id"], serde_json::Value::Null);
        assert_eq!(value["steps_metadata"]["1"]["next_steps"][0], "2");
        assert!(value["branching_steps"].as_array().unwrap().is_empty());
        Ok(())
    }
}
