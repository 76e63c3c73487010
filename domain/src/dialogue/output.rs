//! Final result of a debate run.

use crate::argument::entities::ArgumentId;
use crate::argument::graph::ArgumentGraph;
use crate::concession::Concession;
use crate::core::persona::PersonaId;
use crate::dialogue::crux::Crux;
use crate::dialogue::phase::DebatePhase;
use crate::dialogue::turn::{DialogueTurn, TokenUsage};
use crate::event::{DebateLedger, EngineDiagnostics, RunStatus};
use crate::regime::{Regime, RegimeInput, classify_regime, describe_regime};
use crate::semantics::{Camp, SemanticsView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateEngineOutput {
    pub topic: String,
    pub persona_ids: Vec<PersonaId>,
    pub transcript: Vec<DialogueTurn>,
    pub graph: ArgumentGraph,
    pub crux: Option<Crux>,
    /// Grounded extension: arguments nobody has a standing objection to
    pub common_ground: Vec<ArgumentId>,
    pub camps: Vec<Camp>,
    pub concession_trail: Vec<Concession>,
    pub regime: Regime,
    pub regime_description: String,
    pub token_usage: TokenUsage,
    pub duration_ms: u64,
    pub status: RunStatus,
    pub final_phase: DebatePhase,
    pub diagnostics: EngineDiagnostics,
}

impl DebateEngineOutput {
    /// Finalize a ledger. Works on partial runs too: the regime is computed
    /// from whatever graph exists.
    pub fn from_ledger(ledger: &DebateLedger, duration_ms: u64) -> Self {
        let view = SemanticsView::compute(&ledger.graph.snapshot());
        let regime = classify_regime(&RegimeInput {
            participants: &ledger.persona_ids,
            preferred: &view.preferred,
            camps: &view.camps,
            concessions: &ledger.state.concessions,
            crux_phase_started_at: ledger
                .state
                .phase_started_at
                .get(&DebatePhase::CruxSeeking)
                .copied(),
        });
        let regime_description = describe_regime(
            regime,
            &view.camps,
            view.grounded.len(),
            ledger.crux.as_ref(),
        );

        Self {
            topic: ledger.topic.clone(),
            persona_ids: ledger.persona_ids.clone(),
            transcript: ledger.transcript.clone(),
            graph: ledger.graph.clone(),
            crux: ledger.crux.clone(),
            common_ground: view.grounded,
            camps: view.camps,
            concession_trail: ledger.state.concessions.clone(),
            regime,
            regime_description,
            token_usage: ledger.token_usage,
            duration_ms,
            status: ledger.status,
            final_phase: ledger.state.phase,
            diagnostics: ledger.diagnostics,
        }
    }

    pub fn turns(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::entities::Argument;

    #[test]
    fn test_output_from_ledger() {
        let mut ledger = DebateLedger::new();
        ledger.topic = "Cars".to_string();
        ledger.persona_ids = vec!["x".into(), "y".into()];
        ledger
            .graph
            .add_argument(Argument::new("A1", "x", "Ban cars", 1))
            .unwrap();
        ledger
            .graph
            .add_argument(Argument::new("A2", "y", "Cars carry goods", 2))
            .unwrap();
        ledger.graph.add_attack(&"A2".into(), &"A1".into()).unwrap();

        let output = DebateEngineOutput::from_ledger(&ledger, 42);
        assert_eq!(output.common_ground, vec![ArgumentId::new("A2")]);
        assert_eq!(output.camps.len(), 1);
        assert_eq!(output.regime, Regime::Consensus);
        assert_eq!(output.duration_ms, 42);
        assert!(!output.is_complete());
        assert!(output.regime_description.contains("consensus"));
    }

    #[test]
    fn test_output_json_field_names() {
        let output = DebateEngineOutput::from_ledger(&DebateLedger::new(), 0);
        let json = serde_json::to_value(&output).unwrap();
        for field in [
            "topic",
            "persona_ids",
            "transcript",
            "graph",
            "crux",
            "common_ground",
            "camps",
            "concession_trail",
            "regime",
            "regime_description",
            "token_usage",
            "duration_ms",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert!(json["crux"].is_null());
    }
}
