//! Crystallization diffs.
//!
//! A [`CrystallizationResult`] is the structured graph edit that the
//! crystallization capability extracts from one or more dialogue turns.
//! The capability hands back raw JSON; [`parse_crystallization`] turns it
//! into a diff and rejects anything structurally invalid so the caller can
//! fall back to an empty diff.
//!
//! Accepted payload shapes:
//! 1. A JSON object (`new_args`, `updated_args`, `removed_arg_ids`,
//!    `new_attacks`, `removed_attack_ids`; camelCase aliases accepted)
//! 2. A JSON string holding such an object, raw or inside a ` ```json` fence
//! 3. `null`, meaning "nothing to change"

use super::entities::{ArgumentId, ArgumentPatch, AttackId};
use super::graph::ArgumentGraph;
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Why a crystallization payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedCrystallization {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload text does not contain JSON")]
    UnparseableText,

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("new argument has an empty id")]
    EmptyArgumentId,

    #[error("argument {0} has an empty claim")]
    EmptyClaim(ArgumentId),

    #[error("argument {0} is introduced twice")]
    DuplicateNewArgument(ArgumentId),

    #[error("argument id {0} is already in use")]
    ArgumentIdInUse(ArgumentId),

    #[error("update for {0} changes nothing")]
    EmptyPatch(ArgumentId),

    #[error("attack has an empty endpoint")]
    EmptyAttackEndpoint,
}

/// An argument introduced by a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArgument {
    pub id: ArgumentId,
    pub claim: String,
    #[serde(default)]
    pub assumptions: BTreeSet<String>,
    /// Attributed speaker; defaults to the persona whose turn is crystallized.
    #[serde(default, alias = "speakerId", skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<PersonaId>,
}

impl NewArgument {
    pub fn new(id: impl Into<ArgumentId>, claim: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claim: claim.into(),
            assumptions: BTreeSet::new(),
            speaker_id: None,
        }
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.insert(assumption.into());
        self
    }

    pub fn spoken_by(mut self, speaker: impl Into<PersonaId>) -> Self {
        self.speaker_id = Some(speaker.into());
        self
    }
}

/// An attack introduced by a diff. The store assigns an id when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AttackId>,
    #[serde(alias = "sourceArgId", alias = "source_arg_id")]
    pub source: ArgumentId,
    #[serde(alias = "targetArgId", alias = "target_arg_id")]
    pub target: ArgumentId,
}

impl NewAttack {
    pub fn new(source: impl Into<ArgumentId>, target: impl Into<ArgumentId>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Structured graph edit extracted from dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystallizationResult {
    #[serde(alias = "newArgs")]
    pub new_args: Vec<NewArgument>,
    #[serde(alias = "updatedArgs")]
    pub updated_args: Vec<ArgumentPatch>,
    #[serde(alias = "removedArgIds")]
    pub removed_arg_ids: Vec<ArgumentId>,
    #[serde(alias = "newAttacks")]
    pub new_attacks: Vec<NewAttack>,
    #[serde(alias = "removedAttackIds")]
    pub removed_attack_ids: Vec<AttackId>,
}

impl CrystallizationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.new_args.is_empty()
            && self.updated_args.is_empty()
            && self.removed_arg_ids.is_empty()
            && self.new_attacks.is_empty()
            && self.removed_attack_ids.is_empty()
    }

    pub fn with_argument(mut self, arg: NewArgument) -> Self {
        self.new_args.push(arg);
        self
    }

    pub fn with_update(mut self, patch: ArgumentPatch) -> Self {
        self.updated_args.push(patch);
        self
    }

    pub fn with_removed_argument(mut self, id: impl Into<ArgumentId>) -> Self {
        self.removed_arg_ids.push(id.into());
        self
    }

    pub fn with_attack(mut self, attack: NewAttack) -> Self {
        self.new_attacks.push(attack);
        self
    }

    pub fn with_removed_attack(mut self, id: impl Into<AttackId>) -> Self {
        self.removed_attack_ids.push(id.into());
        self
    }

    /// Structural checks that need no graph: non-empty ids and claims,
    /// unique new ids, non-empty patches.
    pub fn validate_structure(&self) -> Result<(), MalformedCrystallization> {
        let mut seen = HashSet::new();
        for arg in &self.new_args {
            if arg.id.as_str().trim().is_empty() {
                return Err(MalformedCrystallization::EmptyArgumentId);
            }
            if arg.claim.trim().is_empty() {
                return Err(MalformedCrystallization::EmptyClaim(arg.id.clone()));
            }
            if !seen.insert(&arg.id) {
                return Err(MalformedCrystallization::DuplicateNewArgument(
                    arg.id.clone(),
                ));
            }
        }
        for patch in &self.updated_args {
            if patch.is_empty() {
                return Err(MalformedCrystallization::EmptyPatch(patch.id.clone()));
            }
            if let Some(claim) = &patch.claim
                && claim.trim().is_empty()
            {
                return Err(MalformedCrystallization::EmptyClaim(patch.id.clone()));
            }
        }
        for attack in &self.new_attacks {
            if attack.source.as_str().is_empty() || attack.target.as_str().is_empty() {
                return Err(MalformedCrystallization::EmptyAttackEndpoint);
            }
        }
        Ok(())
    }

    /// Checks against the live graph: a new id may not collide with a live
    /// argument unless the same diff removes that argument first.
    pub fn validate_against(&self, graph: &ArgumentGraph) -> Result<(), MalformedCrystallization> {
        let removed: HashSet<&ArgumentId> = self.removed_arg_ids.iter().collect();
        for arg in &self.new_args {
            if graph.contains(&arg.id) && !removed.contains(&arg.id) {
                return Err(MalformedCrystallization::ArgumentIdInUse(arg.id.clone()));
            }
        }
        Ok(())
    }
}

/// Parse and validate a raw crystallization payload against the live graph.
pub fn parse_crystallization(
    payload: &Value,
    graph: &ArgumentGraph,
) -> Result<CrystallizationResult, MalformedCrystallization> {
    let diff = match payload {
        Value::Null => return Ok(CrystallizationResult::empty()),
        Value::Object(_) => from_object(payload)?,
        Value::String(text) => {
            let inner = extract_json(text).ok_or(MalformedCrystallization::UnparseableText)?;
            if !inner.is_object() {
                return Err(MalformedCrystallization::NotAnObject);
            }
            from_object(&inner)?
        }
        _ => return Err(MalformedCrystallization::NotAnObject),
    };
    diff.validate_structure()?;
    diff.validate_against(graph)?;
    Ok(diff)
}

fn from_object(value: &Value) -> Result<CrystallizationResult, MalformedCrystallization> {
    serde_json::from_value(value.clone())
        .map_err(|e| MalformedCrystallization::Schema(e.to_string()))
}

/// Pull a JSON value out of model text: a ` ```json` fenced block first,
/// then the whole text, then the outermost `{...}` span.
pub fn extract_json(text: &str) -> Option<Value> {
    let mut in_block = false;
    let mut block = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            if let Ok(value) = serde_json::from_str::<Value>(&block) {
                return Some(value);
            }
            in_block = false;
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}
