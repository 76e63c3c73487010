//! Grounded labelling.
//!
//! Every argument starts UNDEC. A pass marks IN each UNDEC argument whose
//! attackers are all OUT and marks OUT each UNDEC argument with an IN
//! attacker; passes repeat until one changes nothing.
//!
//! Both rules only ever move an argument out of UNDEC, and each move is
//! justified by labels that can no longer change, so the fixpoint is the
//! same for every visiting order. [`grounded_labelling_in_order`] exposes
//! the order so tests can check exactly that.

use crate::argument::entities::ArgumentId;
use crate::argument::graph::GraphSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acceptance status of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    In,
    Out,
    Undec,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::In => "IN",
            Label::Out => "OUT",
            Label::Undec => "UNDEC",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Labels aligned with the argument order of the snapshot they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labelling {
    labels: Vec<Label>,
}

impl Labelling {
    pub fn label(&self, index: usize) -> Label {
        self.labels[index]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|l| **l == label).count()
    }

    /// Indices labelled IN (the grounded extension)
    pub fn in_indices(&self) -> Vec<usize> {
        self.indices_with(Label::In)
    }

    pub fn indices_with(&self, label: Label) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Key the labels by argument id
    pub fn to_map(&self, snapshot: &GraphSnapshot) -> BTreeMap<ArgumentId, Label> {
        snapshot
            .arguments()
            .iter()
            .zip(&self.labels)
            .map(|(a, l)| (a.id.clone(), *l))
            .collect()
    }
}

/// Grounded labelling, visiting arguments in snapshot order.
pub fn grounded_labelling(snapshot: &GraphSnapshot) -> Labelling {
    let order: Vec<usize> = (0..snapshot.len()).collect();
    fixpoint(snapshot, &order)
}

/// Grounded labelling with an explicit visiting order.
///
/// `order` must be a permutation of the argument indices; anything else
/// falls back to snapshot order.
pub fn grounded_labelling_in_order(snapshot: &GraphSnapshot, order: &[usize]) -> Labelling {
    if is_permutation(order, snapshot.len()) {
        fixpoint(snapshot, order)
    } else {
        grounded_labelling(snapshot)
    }
}

fn fixpoint(snapshot: &GraphSnapshot, order: &[usize]) -> Labelling {
    let mut labels = vec![Label::Undec; snapshot.len()];

    loop {
        let mut changed = false;
        for &i in order {
            if labels[i] != Label::Undec {
                continue;
            }
            let attackers = snapshot.attackers_of(i);
            if attackers.iter().all(|&a| labels[a] == Label::Out) {
                labels[i] = Label::In;
                changed = true;
            } else if attackers.iter().any(|&a| labels[a] == Label::In) {
                labels[i] = Label::Out;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    Labelling { labels }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// Number of UNDEC arguments with an attack edge to or from an IN or
/// another UNDEC argument.
pub fn contested_frontier(snapshot: &GraphSnapshot, labelling: &Labelling) -> usize {
    (0..snapshot.len())
        .filter(|&i| labelling.label(i) == Label::Undec)
        .filter(|&i| {
            let live =
                |j: &usize| *j != i && matches!(labelling.label(*j), Label::In | Label::Undec);
            snapshot.attackers_of(i).iter().any(live) || snapshot.targets_of(i).iter().any(live)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attack() {
        // A1 (x) attacked by A2 (y)
        let snapshot = GraphSnapshot::from_edges(2, &[(1, 0)]);
        let labelling = grounded_labelling(&snapshot);
        assert_eq!(labelling.label(0), Label::Out);
        assert_eq!(labelling.label(1), Label::In);
        assert_eq!(contested_frontier(&snapshot, &labelling), 0);
    }

    #[test]
    fn test_three_cycle_all_undec() {
        let snapshot = GraphSnapshot::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        let labelling = grounded_labelling(&snapshot);
        assert_eq!(labelling.count(Label::Undec), 3);
        assert!(labelling.in_indices().is_empty());
        assert_eq!(contested_frontier(&snapshot, &labelling), 3);
    }

    #[test]
    fn test_reinstatement_chain() {
        // a2 -> a1 -> a0: a2 IN, a1 OUT, a0 IN
        let snapshot = GraphSnapshot::from_edges(3, &[(2, 1), (1, 0)]);
        let labelling = grounded_labelling(&snapshot);
        assert_eq!(labelling.labels(), &[Label::In, Label::Out, Label::In]);
    }

    #[test]
    fn test_self_attack_is_undec() {
        let snapshot = GraphSnapshot::from_edges(2, &[(0, 0), (0, 1)]);
        let labelling = grounded_labelling(&snapshot);
        assert_eq!(labelling.label(0), Label::Undec);
        assert_eq!(labelling.label(1), Label::Undec);
    }

    #[test]
    fn test_reverse_order_gives_same_result() {
        let snapshot = GraphSnapshot::from_edges(5, &[(4, 3), (3, 2), (2, 1), (1, 0)]);
        let forward = grounded_labelling(&snapshot);
        let reverse = grounded_labelling_in_order(&snapshot, &[4, 3, 2, 1, 0]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_invalid_order_falls_back() {
        let snapshot = GraphSnapshot::from_edges(2, &[(1, 0)]);
        let labelling = grounded_labelling_in_order(&snapshot, &[0, 0]);
        assert_eq!(labelling, grounded_labelling(&snapshot));
    }

    #[test]
    fn test_frontier_ignores_undec_touching_only_out() {
        // a0 <-> a1 (2-cycle, UNDEC); a2 IN attacks a3 -> a3 OUT
        let snapshot = GraphSnapshot::from_edges(4, &[(0, 1), (1, 0), (2, 3)]);
        let labelling = grounded_labelling(&snapshot);
        assert_eq!(contested_frontier(&snapshot, &labelling), 2);
    }

    #[test]
    fn test_label_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Label::Undec).unwrap(), "\"UNDEC\"");
    }

    #[test]
    fn test_to_map_keys_by_id() {
        let snapshot = GraphSnapshot::from_edges(2, &[(1, 0)]);
        let map = grounded_labelling(&snapshot).to_map(&snapshot);
        assert_eq!(map[&ArgumentId::new("a1")], Label::In);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn graph_strategy() -> impl Strategy<Value = GraphSnapshot> {
        (1usize..12).prop_flat_map(|n| {
            proptest::collection::vec((0..n, 0..n), 0..(n * 3))
                .prop_map(move |edges| GraphSnapshot::from_edges(n, &edges))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Relabelling the same graph twice gives identical results.
        #[test]
        fn prop_labelling_is_deterministic(snapshot in graph_strategy()) {
            prop_assert_eq!(grounded_labelling(&snapshot), grounded_labelling(&snapshot));
        }

        /// Any visiting order reaches the same fixpoint.
        #[test]
        fn prop_labelling_is_order_independent(
            (snapshot, order) in graph_strategy().prop_flat_map(|s| {
                let n = s.len();
                (Just(s), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            })
        ) {
            let natural = grounded_labelling(&snapshot);
            let shuffled = grounded_labelling_in_order(&snapshot, &order);
            prop_assert_eq!(natural, shuffled);
        }

        /// The result is a legal grounded labelling: IN iff all attackers
        /// OUT, OUT iff some attacker IN.
        #[test]
        fn prop_labelling_is_legal(snapshot in graph_strategy()) {
            let labelling = grounded_labelling(&snapshot);
            for i in 0..snapshot.len() {
                let attackers = snapshot.attackers_of(i);
                let all_out = attackers.iter().all(|&a| labelling.label(a) == Label::Out);
                let some_in = attackers.iter().any(|&a| labelling.label(a) == Label::In);
                prop_assert_eq!(labelling.label(i) == Label::In, all_out);
                prop_assert_eq!(labelling.label(i) == Label::Out, some_in);
            }
        }
    }
}
