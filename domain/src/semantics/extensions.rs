//! Preferred extensions and camps.
//!
//! Every preferred extension contains the grounded extension and excludes
//! every argument the grounded labelling marks OUT, so the search only has
//! to decide the UNDEC arguments. Attacks between IN/OUT arguments and
//! UNDEC ones never affect admissibility of a grounded superset, which
//! reduces the problem to the subgraph induced by the UNDEC arguments.
//!
//! Up to [`EXACT_ENUMERATION_LIMIT`] UNDEC arguments the maximal admissible
//! sets are enumerated exactly. Beyond that a bounded greedy search is used:
//! seed with each UNDEC argument, extend while admissible, keep the maximal
//! results.

use super::labelling::{Label, Labelling};
use crate::argument::entities::ArgumentId;
use crate::argument::graph::GraphSnapshot;
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Largest number of undecided arguments searched exhaustively.
pub const EXACT_ENUMERATION_LIMIT: usize = 20;

/// A conflict-free, self-defending set of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Extension {
    /// Sorted argument ids
    pub argument_ids: Vec<ArgumentId>,
}

impl Extension {
    pub fn new(mut argument_ids: Vec<ArgumentId>) -> Self {
        argument_ids.sort();
        argument_ids.dedup();
        Self { argument_ids }
    }

    pub fn len(&self) -> usize {
        self.argument_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.argument_ids.is_empty()
    }

    pub fn contains(&self, id: &ArgumentId) -> bool {
        self.argument_ids.binary_search(id).is_ok()
    }

    pub fn is_superset_of(&self, other: &Extension) -> bool {
        other.argument_ids.iter().all(|id| self.contains(id))
    }
}

/// Speakers grouped behind one non-empty preferred extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    /// Position of the extension in the preferred list
    pub extension_index: usize,
    pub argument_ids: Vec<ArgumentId>,
    pub persona_ids: BTreeSet<PersonaId>,
    /// Arguments each persona contributes to the camp
    pub persona_argument_counts: BTreeMap<PersonaId, usize>,
}

impl Camp {
    pub fn size(&self) -> usize {
        self.argument_ids.len()
    }

    pub fn is_disjoint_from(&self, other: &Camp) -> bool {
        self.persona_ids.is_disjoint(&other.persona_ids)
    }
}

/// Preferred extensions computed from a fresh grounded labelling.
pub fn preferred_extensions(snapshot: &GraphSnapshot) -> Vec<Extension> {
    let labelling = super::labelling::grounded_labelling(snapshot);
    preferred_extensions_with(snapshot, &labelling)
}

/// Preferred extensions given the snapshot's grounded labelling.
pub fn preferred_extensions_with(snapshot: &GraphSnapshot, labelling: &Labelling) -> Vec<Extension> {
    let grounded = labelling.in_indices();
    let undecided = labelling.indices_with(Label::Undec);

    let local_sets = if undecided.len() <= EXACT_ENUMERATION_LIMIT {
        exact_maximal_admissible(snapshot, &undecided)
    } else {
        greedy_maximal_admissible(snapshot, &grounded, &undecided)
    };

    let mut extensions: Vec<Extension> = local_sets
        .into_iter()
        .map(|local| {
            let ids = grounded
                .iter()
                .chain(local.iter())
                .map(|&i| snapshot.argument(i).id.clone())
                .collect();
            Extension::new(ids)
        })
        .collect();
    extensions.sort();
    extensions.dedup();
    extensions
}

/// Group each non-empty extension's arguments by speaker.
///
/// Arguments absent from every preferred extension belong to no camp.
pub fn camps(snapshot: &GraphSnapshot, extensions: &[Extension]) -> Vec<Camp> {
    extensions
        .iter()
        .enumerate()
        .filter(|(_, ext)| !ext.is_empty())
        .map(|(extension_index, ext)| {
            let mut persona_argument_counts: BTreeMap<PersonaId, usize> = BTreeMap::new();
            for argument in snapshot.arguments().iter().filter(|a| ext.contains(&a.id)) {
                *persona_argument_counts
                    .entry(argument.speaker_id.clone())
                    .or_default() += 1;
            }
            Camp {
                extension_index,
                argument_ids: ext.argument_ids.clone(),
                persona_ids: persona_argument_counts.keys().cloned().collect(),
                persona_argument_counts,
            }
        })
        .collect()
}

/// Conflict-freeness and self-defence of an arbitrary index set over the
/// whole snapshot.
pub fn is_admissible(snapshot: &GraphSnapshot, set: &[usize]) -> bool {
    let members: BTreeSet<usize> = set.iter().copied().collect();
    for &a in &members {
        if snapshot.targets_of(a).iter().any(|t| members.contains(t)) {
            return false;
        }
    }
    members.iter().all(|&m| {
        snapshot.attackers_of(m).iter().all(|&b| {
            snapshot
                .attackers_of(b)
                .iter()
                .any(|c| members.contains(c))
        })
    })
}

// ==================== Exact search ====================

/// Attack masks of the subgraph induced by `undecided` (at most 20 nodes).
struct LocalGraph {
    attackers: Vec<u32>,
    self_attacking: Vec<bool>,
}

impl LocalGraph {
    fn build(snapshot: &GraphSnapshot, undecided: &[usize]) -> Self {
        let position: BTreeMap<usize, usize> =
            undecided.iter().enumerate().map(|(k, &g)| (g, k)).collect();
        let mut attackers = vec![0u32; undecided.len()];
        let mut self_attacking = vec![false; undecided.len()];
        for (k, &g) in undecided.iter().enumerate() {
            for a in snapshot.attackers_of(g) {
                if let Some(&j) = position.get(a) {
                    attackers[k] |= 1 << j;
                    if j == k {
                        self_attacking[k] = true;
                    }
                }
            }
        }
        Self {
            attackers,
            self_attacking,
        }
    }

    fn attacks(&self, from: usize, to: usize) -> bool {
        self.attackers[to] & (1 << from) != 0
    }

    fn is_admissible(&self, set: u32) -> bool {
        (0..self.attackers.len())
            .filter(|m| set & (1 << m) != 0)
            .all(|m| {
                let mut threats = self.attackers[m];
                while threats != 0 {
                    let b = threats.trailing_zeros() as usize;
                    threats &= threats - 1;
                    if set & self.attackers[b] == 0 {
                        return false;
                    }
                }
                true
            })
    }
}

fn exact_maximal_admissible(snapshot: &GraphSnapshot, undecided: &[usize]) -> Vec<Vec<usize>> {
    let local = LocalGraph::build(snapshot, undecided);
    let mut admissible = Vec::new();
    collect_conflict_free(&local, 0, 0, &mut admissible);

    admissible.sort_by_key(|set: &u32| std::cmp::Reverse(set.count_ones()));
    let mut maximal: Vec<u32> = Vec::new();
    for set in admissible {
        if !maximal.iter().any(|&m| m & set == set) {
            maximal.push(set);
        }
    }

    maximal
        .into_iter()
        .map(|set| {
            (0..undecided.len())
                .filter(|k| set & (1 << k) != 0)
                .map(|k| undecided[k])
                .collect()
        })
        .collect()
}

fn collect_conflict_free(local: &LocalGraph, next: usize, set: u32, out: &mut Vec<u32>) {
    if next == local.attackers.len() {
        if local.is_admissible(set) {
            out.push(set);
        }
        return;
    }

    let compatible = !local.self_attacking[next]
        && (0..next)
            .filter(|m| set & (1 << m) != 0)
            .all(|m| !local.attacks(m, next) && !local.attacks(next, m));
    if compatible {
        collect_conflict_free(local, next + 1, set | (1 << next), out);
    }
    collect_conflict_free(local, next + 1, set, out);
}

// ==================== Greedy search ====================

fn greedy_maximal_admissible(
    snapshot: &GraphSnapshot,
    grounded: &[usize],
    undecided: &[usize],
) -> Vec<Vec<usize>> {
    let admissible_with = |local: &[usize]| {
        let mut set = grounded.to_vec();
        set.extend_from_slice(local);
        is_admissible(snapshot, &set)
    };

    let mut results: Vec<Vec<usize>> = Vec::new();
    let seeds = std::iter::once(None).chain(undecided.iter().map(|&u| Some(u)));
    for seed in seeds {
        let mut current: Vec<usize> = seed.into_iter().collect();
        if !admissible_with(&current) {
            continue;
        }
        for &candidate in undecided {
            if current.contains(&candidate) {
                continue;
            }
            current.push(candidate);
            if !admissible_with(&current) {
                current.pop();
            }
        }
        current.sort_unstable();
        if !results.contains(&current) {
            results.push(current);
        }
    }

    let subsumed = |set: &Vec<usize>, others: &[Vec<usize>]| {
        others
            .iter()
            .any(|o| o.len() > set.len() && set.iter().all(|x| o.contains(x)))
    };
    let snapshot_of_results = results.clone();
    results.retain(|set| !subsumed(set, &snapshot_of_results));
    results
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::semantics::labelling::grounded_labelling;
    use proptest::prelude::*;

    fn graph_strategy() -> impl Strategy<Value = GraphSnapshot> {
        (1usize..10).prop_flat_map(|n| {
            proptest::collection::vec((0..n, 0..n), 0..(n * 2))
                .prop_map(move |edges| GraphSnapshot::from_edges(n, &edges))
        })
    }

    fn indices(snapshot: &GraphSnapshot, ext: &Extension) -> Vec<usize> {
        ext.argument_ids
            .iter()
            .filter_map(|id| snapshot.index_of(id))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// The grounded extension is contained in every preferred extension.
        #[test]
        fn prop_grounded_subset_of_preferred(snapshot in graph_strategy()) {
            let labelling = grounded_labelling(&snapshot);
            let preferred = preferred_extensions_with(&snapshot, &labelling);
            prop_assert!(!preferred.is_empty());
            for ext in &preferred {
                for i in labelling.in_indices() {
                    prop_assert!(ext.contains(&snapshot.argument(i).id));
                }
            }
        }

        /// Every preferred extension is admissible and none contains another.
        #[test]
        fn prop_preferred_are_maximal_admissible(snapshot in graph_strategy()) {
            let preferred = preferred_extensions(&snapshot);
            for ext in &preferred {
                prop_assert!(is_admissible(&snapshot, &indices(&snapshot, ext)));
                for other in &preferred {
                    if other != ext {
                        prop_assert!(!other.is_superset_of(ext));
                    }
                }
            }
        }
    }
}
