//! Argumentation graph store and immutable snapshots.
//!
//! [`ArgumentGraph`] is the only owner of arguments and attacks during a
//! run. Every attack it holds references two live arguments: attacks with
//! a missing endpoint are rejected on insert and removing an argument
//! cascades to every attack touching it.
//!
//! [`GraphSnapshot`] is the read side: an arena of arguments plus an
//! index-based attack list, which is what the semantics functions consume.

use super::diff::CrystallizationResult;
use super::entities::{Argument, ArgumentId, ArgumentPatch, Attack, AttackId, PatchEffect};
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from direct store mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("argument {0} already exists")]
    DuplicateArgument(ArgumentId),

    #[error("argument {0} does not exist")]
    UnknownArgument(ArgumentId),

    #[error("attack {source_id} -> {target} references a missing argument")]
    DanglingAttack {
        source_id: ArgumentId,
        target: ArgumentId,
    },

    #[error("attack {0} already exists")]
    DuplicateAttack(AttackId),
}

/// Mutable argumentation graph owned by one debate run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentGraph {
    arguments: Vec<Argument>,
    attacks: Vec<Attack>,
    #[serde(default)]
    next_attack_seq: u64,
}

impl ArgumentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Queries ====================

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn attacks(&self) -> &[Attack] {
        &self.attacks
    }

    pub fn argument(&self, id: &ArgumentId) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.id == *id)
    }

    pub fn contains(&self, id: &ArgumentId) -> bool {
        self.argument(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn attack_count(&self) -> usize {
        self.attacks.len()
    }

    /// Arguments attributed to one speaker
    pub fn arguments_by<'a>(&'a self, speaker: &'a PersonaId) -> impl Iterator<Item = &'a Argument> {
        self.arguments.iter().filter(move |a| a.speaker_id == *speaker)
    }

    /// Attacks whose endpoints are not both live. Always empty for a graph
    /// mutated only through this API.
    pub fn dangling_attacks(&self) -> Vec<&Attack> {
        self.attacks
            .iter()
            .filter(|k| !self.contains(&k.source) || !self.contains(&k.target))
            .collect()
    }

    // ==================== Mutation ====================

    pub fn add_argument(&mut self, argument: Argument) -> Result<(), GraphError> {
        if self.contains(&argument.id) {
            return Err(GraphError::DuplicateArgument(argument.id));
        }
        self.arguments.push(argument);
        Ok(())
    }

    pub fn update_argument(
        &mut self,
        id: &ArgumentId,
        patch: &ArgumentPatch,
    ) -> Result<PatchEffect, GraphError> {
        let argument = self
            .arguments
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| GraphError::UnknownArgument(id.clone()))?;
        Ok(argument.apply_patch(patch))
    }

    /// Remove an argument and every attack touching it.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn remove_argument(&mut self, id: &ArgumentId) -> Option<(Argument, Vec<Attack>)> {
        let pos = self.arguments.iter().position(|a| a.id == *id)?;
        let removed = self.arguments.remove(pos);
        let (cascaded, kept): (Vec<Attack>, Vec<Attack>) =
            std::mem::take(&mut self.attacks)
                .into_iter()
                .partition(|k| k.touches(id));
        self.attacks = kept;
        Some((removed, cascaded))
    }

    /// Add an attack with a store-assigned id.
    pub fn add_attack(
        &mut self,
        source: &ArgumentId,
        target: &ArgumentId,
    ) -> Result<AttackId, GraphError> {
        let id = self.next_attack_id();
        self.insert_attack(Attack::new(id.clone(), source.clone(), target.clone()))?;
        Ok(id)
    }

    /// Add an attack carrying its own id.
    pub fn insert_attack(&mut self, attack: Attack) -> Result<(), GraphError> {
        if !self.contains(&attack.source) || !self.contains(&attack.target) {
            return Err(GraphError::DanglingAttack {
                source_id: attack.source,
                target: attack.target,
            });
        }
        if self.attacks.iter().any(|k| k.id == attack.id) {
            return Err(GraphError::DuplicateAttack(attack.id));
        }
        self.attacks.push(attack);
        Ok(())
    }

    /// Remove an attack. Unknown ids are a no-op and return `None`.
    pub fn remove_attack(&mut self, id: &AttackId) -> Option<Attack> {
        let pos = self.attacks.iter().position(|k| k.id == *id)?;
        Some(self.attacks.remove(pos))
    }

    fn next_attack_id(&mut self) -> AttackId {
        loop {
            self.next_attack_seq += 1;
            let candidate = AttackId::new(format!("atk-{}", self.next_attack_seq));
            if !self.attacks.iter().any(|k| k.id == candidate) {
                return candidate;
            }
        }
    }

    fn has_edge(&self, source: &ArgumentId, target: &ArgumentId) -> bool {
        self.attacks
            .iter()
            .any(|k| k.source == *source && k.target == *target)
    }

    // ==================== Diff Application ====================

    /// Apply a whole crystallization diff.
    ///
    /// Order: removed attacks, removed arguments, updates, new arguments,
    /// new attacks. Edges with a missing endpoint and updates of unknown
    /// arguments are dropped and counted in the report instead of failing.
    pub fn apply(
        &mut self,
        diff: &CrystallizationResult,
        speaker: &PersonaId,
        turn_index: usize,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for id in &diff.removed_attack_ids {
            if self.remove_attack(id).is_some() {
                report.removed_attacks.push(id.clone());
            }
        }

        for id in &diff.removed_arg_ids {
            if let Some((argument, cascaded)) = self.remove_argument(id) {
                report
                    .removed_attacks
                    .extend(cascaded.into_iter().map(|k| k.id));
                report.removed_args.push(argument);
            }
        }

        for patch in &diff.updated_args {
            let Some(previous) = self.argument(&patch.id).cloned() else {
                report.skipped_updates += 1;
                continue;
            };
            if let Ok(effect) = self.update_argument(&patch.id, patch)
                && !effect.is_noop()
            {
                report.updated_args.push(UpdatedArgument { previous, effect });
            }
        }

        for new in &diff.new_args {
            let argument = Argument {
                id: new.id.clone(),
                speaker_id: new.speaker_id.clone().unwrap_or_else(|| speaker.clone()),
                claim: new.claim.clone(),
                assumptions: new.assumptions.clone(),
                created_at_turn: turn_index,
            };
            if self.add_argument(argument).is_ok() {
                report.added_args.push(new.id.clone());
            }
        }

        for new in &diff.new_attacks {
            if !self.contains(&new.source) || !self.contains(&new.target) {
                report.dropped_attacks += 1;
                continue;
            }
            if self.has_edge(&new.source, &new.target) {
                report.duplicate_attacks += 1;
                continue;
            }
            let result = match &new.id {
                Some(id) if !self.attacks.iter().any(|k| k.id == *id) => self
                    .insert_attack(Attack::new(id.clone(), new.source.clone(), new.target.clone()))
                    .map(|_| id.clone()),
                _ => self.add_attack(&new.source, &new.target),
            };
            match result {
                Ok(id) => report.added_attacks.push(id),
                Err(_) => report.dropped_attacks += 1,
            }
        }

        report
    }

    // ==================== Snapshot ====================

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_parts(self.arguments.clone(), self.attacks.clone())
    }
}

/// An argument whose claim or assumptions a diff changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedArgument {
    /// State before the update
    pub previous: Argument,
    pub effect: PatchEffect,
}

/// What a diff application actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub added_args: Vec<ArgumentId>,
    pub updated_args: Vec<UpdatedArgument>,
    /// Removed arguments as they were before removal
    pub removed_args: Vec<Argument>,
    pub added_attacks: Vec<AttackId>,
    /// Explicitly removed attacks plus those cascaded from removed arguments
    pub removed_attacks: Vec<AttackId>,
    /// Attacks dropped because an endpoint did not exist
    pub dropped_attacks: usize,
    /// Updates dropped because the argument did not exist
    pub skipped_updates: usize,
    pub duplicate_attacks: usize,
}

impl ApplyReport {
    /// Count of entries dropped to keep the graph consistent
    pub fn invariant_violations(&self) -> usize {
        self.dropped_attacks + self.skipped_updates
    }

    pub fn changed_graph(&self) -> bool {
        !self.added_args.is_empty()
            || !self.updated_args.is_empty()
            || !self.removed_args.is_empty()
            || !self.added_attacks.is_empty()
            || !self.removed_attacks.is_empty()
    }
}

/// Immutable view of the graph: argument arena + index-based edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    arguments: Vec<Argument>,
    attacks: Vec<Attack>,
    #[serde(skip)]
    edges: Vec<(usize, usize)>,
    #[serde(skip)]
    attackers: Vec<Vec<usize>>,
    #[serde(skip)]
    targets: Vec<Vec<usize>>,
}

impl GraphSnapshot {
    /// Build a snapshot, silently skipping attacks with a missing endpoint.
    pub fn from_parts(arguments: Vec<Argument>, attacks: Vec<Attack>) -> Self {
        let index: HashMap<&ArgumentId, usize> = arguments
            .iter()
            .enumerate()
            .map(|(i, a)| (&a.id, i))
            .collect();

        let mut edges = Vec::with_capacity(attacks.len());
        let mut kept = Vec::with_capacity(attacks.len());
        for attack in attacks {
            if let (Some(&s), Some(&t)) = (index.get(&attack.source), index.get(&attack.target)) {
                edges.push((s, t));
                kept.push(attack);
            }
        }

        let mut attackers = vec![Vec::new(); arguments.len()];
        let mut targets = vec![Vec::new(); arguments.len()];
        for &(s, t) in &edges {
            attackers[t].push(s);
            targets[s].push(t);
        }

        Self {
            arguments,
            attacks: kept,
            edges,
            attackers,
            targets,
        }
    }

    /// Build a snapshot from index pairs (used by tests and generators).
    pub fn from_edges(size: usize, edges: &[(usize, usize)]) -> Self {
        let arguments = (0..size)
            .map(|i| Argument::new(format!("a{i}"), format!("p{}", i % 2), format!("claim {i}"), 0))
            .collect();
        let attacks = edges
            .iter()
            .enumerate()
            .filter(|(_, (s, t))| *s < size && *t < size)
            .map(|(k, (s, t))| Attack::new(format!("k{k}"), format!("a{s}"), format!("a{t}")))
            .collect();
        Self::from_parts(arguments, attacks)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn attacks(&self) -> &[Attack] {
        &self.attacks
    }

    pub fn argument(&self, index: usize) -> &Argument {
        &self.arguments[index]
    }

    pub fn index_of(&self, id: &ArgumentId) -> Option<usize> {
        self.arguments.iter().position(|a| a.id == *id)
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn attackers_of(&self, index: usize) -> &[usize] {
        &self.attackers[index]
    }

    pub fn targets_of(&self, index: usize) -> &[usize] {
        &self.targets[index]
    }

    pub fn attacks_between(&self, a: usize, b: usize) -> bool {
        self.targets[a].contains(&b) || self.targets[b].contains(&a)
    }
}
