//! Argumentation graph entities.
//!
//! - [`ArgumentId`] / [`AttackId`] - identifiers
//! - [`Argument`] - a claim plus its assumptions, attributed to one speaker
//! - [`Attack`] - directed "source undermines target" edge
//! - [`ArgumentPatch`] - in-place edit of a claim and/or its assumptions

use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an argument.
///
/// Ids are chosen by the crystallization source so that attacks inside the
/// same diff can reference freshly introduced arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArgumentId(String);

impl ArgumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for ArgumentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ArgumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an attack edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(String);

impl AttackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AttackId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AttackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A claim with supporting assumptions, attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    pub speaker_id: PersonaId,
    pub claim: String,
    #[serde(default)]
    pub assumptions: BTreeSet<String>,
    pub created_at_turn: usize,
}

impl Argument {
    pub fn new(
        id: impl Into<ArgumentId>,
        speaker_id: impl Into<PersonaId>,
        claim: impl Into<String>,
        created_at_turn: usize,
    ) -> Self {
        Self {
            id: id.into(),
            speaker_id: speaker_id.into(),
            claim: claim.into(),
            assumptions: BTreeSet::new(),
            created_at_turn,
        }
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.insert(assumption.into());
        self
    }

    /// Apply a patch in place, keeping identity. Returns what changed.
    pub fn apply_patch(&mut self, patch: &ArgumentPatch) -> PatchEffect {
        let mut effect = PatchEffect::default();
        if let Some(claim) = &patch.claim
            && *claim != self.claim
        {
            self.claim = claim.clone();
            effect.claim_changed = true;
        }
        if let Some(assumptions) = &patch.assumptions
            && *assumptions != self.assumptions
        {
            self.assumptions = assumptions.clone();
            effect.assumptions_changed = true;
        }
        effect
    }
}

/// Directed edge: `source` undermines `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub id: AttackId,
    pub source: ArgumentId,
    pub target: ArgumentId,
}

impl Attack {
    pub fn new(
        id: impl Into<AttackId>,
        source: impl Into<ArgumentId>,
        target: impl Into<ArgumentId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this attack touches the given argument at either end
    pub fn touches(&self, id: &ArgumentId) -> bool {
        self.source == *id || self.target == *id
    }
}

/// In-place edit of an existing argument.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentPatch {
    pub id: ArgumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<BTreeSet<String>>,
}

impl ArgumentPatch {
    pub fn new(id: impl Into<ArgumentId>) -> Self {
        Self {
            id: id.into(),
            claim: None,
            assumptions: None,
        }
    }

    pub fn with_claim(mut self, claim: impl Into<String>) -> Self {
        self.claim = Some(claim.into());
        self
    }

    pub fn with_assumptions<I, S>(mut self, assumptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assumptions = Some(assumptions.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.claim.is_none() && self.assumptions.is_none()
    }
}

/// What an applied patch actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEffect {
    pub claim_changed: bool,
    pub assumptions_changed: bool,
}

impl PatchEffect {
    pub fn is_noop(&self) -> bool {
        !self.claim_changed && !self.assumptions_changed
    }
}
