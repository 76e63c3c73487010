//! Regime classification of a finished debate.

use crate::concession::Concession;
use crate::core::persona::PersonaId;
use crate::dialogue::crux::Crux;
use crate::semantics::{Camp, Extension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Qualitative verdict on how a debate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Consensus,
    Polarized,
    Partial,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Consensus => "consensus",
            Regime::Polarized => "polarized",
            Regime::Partial => "partial",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the classifier reads.
#[derive(Debug, Clone, Copy)]
pub struct RegimeInput<'a> {
    pub participants: &'a [PersonaId],
    pub preferred: &'a [Extension],
    pub camps: &'a [Camp],
    pub concessions: &'a [Concession],
    /// Turn at which crux seeking began, `None` if the run never got there
    pub crux_phase_started_at: Option<usize>,
}

pub fn classify_regime(input: &RegimeInput<'_>) -> Regime {
    if input.camps.len() == 1 || all_personas_everywhere(input) {
        return Regime::Consensus;
    }

    let since = input.crux_phase_started_at.unwrap_or(0);
    let conceded_late = input.concessions.iter().any(|c| c.turn_index >= since);
    let pairwise_disjoint = input.camps.iter().enumerate().all(|(i, a)| {
        input.camps[i + 1..]
            .iter()
            .all(|b| a.is_disjoint_from(b))
    });

    if input.camps.len() >= 2 && pairwise_disjoint && !conceded_late {
        Regime::Polarized
    } else {
        Regime::Partial
    }
}

/// Every participant contributes to every preferred extension.
fn all_personas_everywhere(input: &RegimeInput<'_>) -> bool {
    if input.participants.is_empty() || input.camps.is_empty() {
        return false;
    }
    let everyone: BTreeSet<&PersonaId> = input.participants.iter().collect();
    let non_empty = input.preferred.iter().filter(|e| !e.is_empty()).count();
    non_empty == input.preferred.len()
        && input.camps.len() == non_empty
        && input.camps.iter().all(|camp| {
            let members: BTreeSet<&PersonaId> = camp.persona_ids.iter().collect();
            everyone.is_subset(&members)
        })
}

/// Short templated sentence describing the outcome.
pub fn describe_regime(
    regime: Regime,
    camps: &[Camp],
    common_ground: usize,
    crux: Option<&Crux>,
) -> String {
    let sizes = camps
        .iter()
        .map(|c| c.size().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let common = match common_ground {
        0 => "no arguments accepted by everyone".to_string(),
        1 => "1 argument accepted by everyone".to_string(),
        n => format!("{} arguments accepted by everyone", n),
    };
    let crux_clause = match crux {
        Some(c) if c.acknowledged => format!(" Agreed crux: {}", c.statement),
        Some(c) => format!(" Proposed crux: {}", c.statement),
        None => String::new(),
    };

    let headline = match regime {
        Regime::Consensus => match camps.len() {
            0 => "The debate reached consensus".to_string(),
            _ => format!("The debate reached consensus around one position of {} arguments", sizes),
        },
        Regime::Polarized => format!(
            "The debate ended polarized into {} camps of sizes {}",
            camps.len(),
            sizes
        ),
        Regime::Partial => match camps.len() {
            0 => "The debate ended with no defensible position".to_string(),
            n => format!("The debate ended in partial agreement across {} camps of sizes {}", n, sizes),
        },
    };

    format!("{}, with {}.{}", headline, common, crux_clause)
}
