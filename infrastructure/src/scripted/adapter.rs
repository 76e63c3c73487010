//! Scripted implementation of the turn and crystallization ports.

use super::script::{DebateScript, ScriptedTurn};
use async_trait::async_trait;
use dialectic_application::{
    CrystallizationCapability, CrystallizationPayload, CrystallizationRequest, GeneratedTurn,
    GenerationError, TurnGenerator, TurnRequest,
};
use dialectic_domain::{PersonaId, Topic};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Replays a [`DebateScript`]: turn N of the run is turn N of the script.
pub struct ScriptedDebate {
    script: DebateScript,
}

impl ScriptedDebate {
    pub fn new(script: DebateScript) -> Self {
        Self { script }
    }

    pub fn len(&self) -> usize {
        self.script.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.turns.is_empty()
    }

    /// Topic declared by the script, if any
    pub fn topic(&self) -> Option<Topic> {
        self.script.topic.as_deref().and_then(|t| Topic::try_new(t))
    }

    pub fn personas(&self) -> &[PersonaId] {
        &self.script.personas
    }

    fn turn(&self, turn_index: usize) -> Option<&ScriptedTurn> {
        turn_index
            .checked_sub(1)
            .and_then(|i| self.script.turns.get(i))
    }
}

#[async_trait]
impl TurnGenerator for ScriptedDebate {
    async fn generate_turn(
        &self,
        request: TurnRequest<'_>,
    ) -> Result<GeneratedTurn, GenerationError> {
        let Some(scripted) = self.turn(request.turn_index) else {
            return Err(GenerationError::Exhausted);
        };

        if let Some(expected) = &scripted.persona
            && expected != request.speaker
        {
            warn!(
                "Script expects {} at turn {}, engine picked {}",
                expected, request.turn_index, request.speaker
            );
        }

        let mut turn = GeneratedTurn::new(scripted.dialogue.clone(), scripted.move_type)
            .with_token_usage(scripted.tokens);
        if scripted.concession_signal {
            turn = turn.with_concession_signal();
        }
        if scripted.acknowledges_crux {
            turn = turn.acknowledging_crux();
        }
        if let Some(crux) = &scripted.crux {
            turn = turn.with_crux(crux.to_proposal());
        }
        Ok(turn)
    }
}

#[async_trait]
impl CrystallizationCapability for ScriptedDebate {
    async fn crystallize(
        &self,
        request: CrystallizationRequest<'_>,
    ) -> Result<CrystallizationPayload, GenerationError> {
        let Some(current) = self.turn(request.turn.turn_index) else {
            return Err(GenerationError::Exhausted);
        };

        let mut payloads: Vec<&Value> = request
            .pending_turns
            .iter()
            .filter_map(|t| self.turn(t.turn_index))
            .filter_map(|t| t.crystallization.as_ref())
            .collect();
        payloads.extend(current.crystallization.as_ref());

        let payload = merge_payloads(&payloads);
        debug!(
            "Scripted crystallization for turn {} ({} payloads)",
            request.turn.turn_index,
            payloads.len()
        );
        Ok(CrystallizationPayload::new(payload).with_token_usage(current.crystallization_tokens))
    }
}

/// Combine the payloads of batched turns. Objects are merged by
/// concatenating their list fields; anything else falls back to the last
/// payload.
fn merge_payloads(payloads: &[&Value]) -> Value {
    match payloads {
        [] => Value::Null,
        [single] => (*single).clone(),
        many if many.iter().all(|p| p.is_object()) => {
            let mut merged = Map::new();
            for (key, value) in many.iter().filter_map(|p| p.as_object()).flatten() {
                match (merged.get_mut(key), value) {
                    (Some(Value::Array(existing)), Value::Array(items)) => {
                        existing.extend(items.iter().cloned())
                    }
                    _ => {
                        merged.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        many => many.last().map(|p| (*p).clone()).unwrap_or(Value::Null),
    }
}
