use std::collections::{BTreeMap, BTreeSet};

/// Directed graph over tool tokens: `a -> b` means some sequence has `b`
/// immediately after `a`. Edges carry no weight.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransitionGraph {
    successors: BTreeMap<String, BTreeSet<String>>,
}

impl TransitionGraph {
    /// Collect every adjacent pair of non-empty tokens in `sequences`.
    pub fn build<S: AsRef<str>>(sequences: &[Vec<S>]) -> Self {
        let mut graph = Self::default();
        for sequence in sequences {
            for pair in sequence.windows(2) {
                let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
                if !a.is_empty() && !b.is_empty() {
                    graph.add_edge(a, b);
                }
            }
        }
        log::debug!(
            "transition graph: {} tokens with successors, {} edges",
            graph.successors.len(),
            graph.edge_count(),
        );
        graph
    }

    /// Idempotent.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if let Some(set) = self.successors.get_mut(from) {
            set.insert(to.to_owned());
        } else {
            self.successors
                .insert(from.to_owned(), BTreeSet::from([to.to_owned()]));
        }
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.successors
            .get(from)
            .is_some_and(|set| set.contains(to))
    }

    /// Observed successors of `token`, ascending.
    pub fn successors<'a>(&'a self, token: &str) -> impl Iterator<Item = &'a str> {
        self.successors
            .get(token)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// All edges, sorted by source then target.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.successors
            .iter()
            .flat_map(|(from, to)| to.iter().map(move |t| (from.as_str(), t.as_str())))
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build() {
        let sequences = vec![vec!["T1", "T2", "T3"], vec!["T2", "T4"], vec!["T1", "T5"]];
        let graph = TransitionGraph::build(&sequences);
        assert!(graph.has_edge("T1", "T2"));
        assert!(graph.has_edge("T2", "T3"));
        assert!(graph.has_edge("T2", "T4"));
        assert!(graph.has_edge("T1", "T5"));
        assert!(!graph.has_edge("T1", "T4"));
        assert!(!graph.has_edge("T2", "T1"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_repeated_pairs_collapse() {
        let sequences = vec![vec!["a", "b", "a", "b"], vec!["a", "b"]];
        let graph = TransitionGraph::build(&sequences);
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![("a", "b"), ("b", "a")]
        );
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let sequences = vec![vec!["a", "", "b"], vec!["c"]];
        let graph = TransitionGraph::build(&sequences);
        assert!(graph.is_empty());
        assert_eq!(graph.successors("a").count(), 0);
    }
}
