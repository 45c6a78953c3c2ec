use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use workflow::StepRecord;

/// Order the steps in `metadata` with Kahn's algorithm.
///
/// Only edges between steps present in `metadata` count. Among all steps that
/// are ready at a given point, the smallest id is always taken next. Steps left
/// over because they sit on (or behind) a cycle are appended in ascending order,
/// so every key appears in the output exactly once.
pub fn resolve(metadata: &BTreeMap<String, StepRecord>) -> Vec<String> {
    let mut in_degree: BTreeMap<&str, usize> = metadata.keys().map(|k| (k.as_str(), 0)).collect();
    let mut successors: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (id, record) in metadata {
        for next in record.valid_next_steps() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree += 1;
                successors.entry(id.as_str()).or_default().push(next);
            }
        }
    }

    // min-heap on step id:
    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| Reverse(*id))
        .collect();

    let mut order = Vec::with_capacity(metadata.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id.to_owned());
        for next in successors.get(id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(*next));
                }
            }
        }
    }

    if order.len() < metadata.len() {
        let residual: Vec<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree > 0)
            .map(|(id, _)| *id)
            .collect();
        log::debug!("{} steps left on cycles: {residual:?}", residual.len());
        order.extend(residual.into_iter().map(str::to_owned));
    }

    order
}
