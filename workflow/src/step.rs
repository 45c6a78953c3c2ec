use serde::{Deserialize, Serialize};

/// One step of a workflow, optionally bound to a tool.
///
/// `next_steps` keeps the order the graph store reported, and may reference
/// step ids that don't exist in the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: String,
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_version: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl StepRecord {
    /// Create a step with no tool and no outgoing edges.
    pub fn new(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            tool_id: None,
            tool_name: None,
            tool_version: None,
            next_steps: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool_id: impl Into<String>) -> Self {
        self.tool_id = Some(tool_id.into());
        self
    }

    pub fn with_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_version(mut self, tool_version: impl Into<String>) -> Self {
        self.tool_version = Some(tool_version.into());
        self
    }

    pub fn with_next<I, S>(mut self, next: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_steps = next.into_iter().map(Into::into).collect();
        self
    }

    /// True if this step has no usable tool identifier.
    pub fn is_tool_less(&self) -> bool {
        self.tool_id.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    /// Non-empty outgoing references, in the order they were given.
    pub fn valid_next_steps(&self) -> impl Iterator<Item = &str> {
        self.next_steps
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Shape of a step as exported by the graph store, before validation.
/// Graph stores emit `null` inside edge lists for steps without successors.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    pub step_id: Option<String>,
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default, alias = "name")]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_version: Option<String>,
    #[serde(default, alias = "next_step_ids")]
    pub next_steps: Option<Vec<Option<String>>>,
}

impl RawStep {
    pub(crate) fn into_record(self, step_id: String) -> StepRecord {
        StepRecord {
            step_id,
            tool_id: self.tool_id,
            tool_name: self.tool_name,
            tool_version: self.tool_version,
            next_steps: self
                .next_steps
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}
