//! Compact graph digest handed to the turn generator.

use crate::argument::entities::ArgumentId;
use crate::argument::graph::ArgumentGraph;
use crate::core::persona::PersonaId;
use crate::semantics::{Label, SemanticsView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDigest {
    pub id: ArgumentId,
    pub speaker_id: PersonaId,
    pub claim: String,
    pub label: Label,
    /// Ids of arguments attacking this one
    pub attacked_by: Vec<ArgumentId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub arguments: Vec<ArgumentDigest>,
    pub attack_count: usize,
    pub in_count: usize,
    pub out_count: usize,
    pub undec_count: usize,
    pub contested_frontier: usize,
    pub camp_count: usize,
}

impl GraphSummary {
    pub fn new(graph: &ArgumentGraph, view: &SemanticsView) -> Self {
        let arguments = graph
            .arguments()
            .iter()
            .map(|a| ArgumentDigest {
                id: a.id.clone(),
                speaker_id: a.speaker_id.clone(),
                claim: a.claim.clone(),
                label: view.label_of(&a.id).unwrap_or(Label::Undec),
                attacked_by: graph
                    .attacks()
                    .iter()
                    .filter(|k| k.target == a.id)
                    .map(|k| k.source.clone())
                    .collect(),
            })
            .collect();

        Self {
            arguments,
            attack_count: graph.attack_count(),
            in_count: view.count(Label::In),
            out_count: view.count(Label::Out),
            undec_count: view.count(Label::Undec),
            contested_frontier: view.contested_frontier,
            camp_count: view.camps.len(),
        }
    }

    /// Arguments of one persona that currently stand defeated
    pub fn defeated_for(&self, persona: &PersonaId) -> Vec<&ArgumentDigest> {
        self.arguments
            .iter()
            .filter(|a| &a.speaker_id == persona && a.label == Label::Out)
            .collect()
    }

    /// Plain-text rendering for prompt-building turn generators
    pub fn render(&self) -> String {
        if self.arguments.is_empty() {
            return "(no arguments yet)".to_string();
        }
        let mut out = String::new();
        for a in &self.arguments {
            out.push_str(&format!("[{}] {} ({}): {}", a.label, a.id, a.speaker_id, a.claim));
            if !a.attacked_by.is_empty() {
                let attackers: Vec<&str> = a.attacked_by.iter().map(|id| id.as_str()).collect();
                out.push_str(&format!(" <- attacked by {}", attackers.join(", ")));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "IN {} / OUT {} / UNDEC {}, contested frontier {}",
            self.in_count, self.out_count, self.undec_count, self.contested_frontier
        ));
        out
    }
}
