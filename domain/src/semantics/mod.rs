//! Acceptance semantics over an argumentation graph
//!
//! Pure functions over an immutable [`GraphSnapshot`]:
//!
//! - [`grounded_labelling`]: IN / OUT / UNDEC by fixpoint iteration
//! - [`preferred_extensions`]: maximal admissible sets
//! - [`camps`]: preferred extensions grouped by speaker
//! - [`contested_frontier`]: how much of the graph is still undecided
//!
//! [`SemanticsView`] bundles all of them for one snapshot; the dialogue
//! controller recomputes it after every applied diff.

pub mod extensions;
pub mod labelling;

pub use extensions::{
    Camp, EXACT_ENUMERATION_LIMIT, Extension, camps, is_admissible, preferred_extensions,
    preferred_extensions_with,
};
pub use labelling::{
    Label, Labelling, contested_frontier, grounded_labelling, grounded_labelling_in_order,
};

use crate::argument::entities::ArgumentId;
use crate::argument::graph::GraphSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the controller reads back after a graph change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticsView {
    pub labels: BTreeMap<ArgumentId, Label>,
    /// Grounded extension (sorted ids)
    pub grounded: Vec<ArgumentId>,
    pub preferred: Vec<Extension>,
    pub camps: Vec<Camp>,
    pub contested_frontier: usize,
}

impl SemanticsView {
    pub fn compute(snapshot: &GraphSnapshot) -> Self {
        let labelling = grounded_labelling(snapshot);
        let preferred = preferred_extensions_with(snapshot, &labelling);
        let camps = camps(snapshot, &preferred);
        let mut grounded: Vec<ArgumentId> = labelling
            .in_indices()
            .into_iter()
            .map(|i| snapshot.argument(i).id.clone())
            .collect();
        grounded.sort();

        Self {
            labels: labelling.to_map(snapshot),
            grounded,
            contested_frontier: contested_frontier(snapshot, &labelling),
            preferred,
            camps,
        }
    }

    pub fn count(&self, label: Label) -> usize {
        self.labels.values().filter(|l| **l == label).count()
    }

    pub fn label_of(&self, id: &ArgumentId) -> Option<Label> {
        self.labels.get(id).copied()
    }
}
