//! Debate script file format.
//!
//! ```toml
//! topic = "Should cities ban private cars?"
//! personas = ["urbanist", "trucker"]
//!
//! [[turns]]
//! persona = "urbanist"
//! move = "CLAIM"
//! dialogue = "Cars choke our streets."
//! crystallization = { new_args = [{ id = "u1", claim = "Cars choke streets" }] }
//!
//! [[turns]]
//! move = "PROPOSE_CRUX"
//! dialogue = "It comes down to induced demand."
//! crux = "Does road space induce demand?"
//! ```

use dialectic_domain::{CruxProposal, Move, PersonaId, TokenUsage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Cannot read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML script: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Script has no turns")]
    NoTurns,

    #[error("Turn {0} has empty dialogue")]
    EmptyDialogue(usize),
}

/// Crux given either as a bare statement or with assumptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptedCrux {
    Statement(String),
    Full(CruxProposal),
}

impl ScriptedCrux {
    pub fn to_proposal(&self) -> CruxProposal {
        match self {
            ScriptedCrux::Statement(statement) => CruxProposal::new(statement.clone()),
            ScriptedCrux::Full(proposal) => proposal.clone(),
        }
    }
}

/// One scripted turn with the crystallization payload it should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTurn {
    /// Expected speaker; only checked, the engine still picks who speaks
    #[serde(default)]
    pub persona: Option<PersonaId>,
    pub dialogue: String,
    #[serde(rename = "move")]
    pub move_type: Move,
    #[serde(default)]
    pub concession_signal: bool,
    #[serde(default)]
    pub acknowledges_crux: bool,
    #[serde(default)]
    pub crux: Option<ScriptedCrux>,
    /// Raw payload handed to the engine; object or text with embedded JSON
    #[serde(default)]
    pub crystallization: Option<Value>,
    #[serde(default)]
    pub tokens: TokenUsage,
    #[serde(default)]
    pub crystallization_tokens: TokenUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebateScript {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub personas: Vec<PersonaId>,
    #[serde(default)]
    pub turns: Vec<ScriptedTurn>,
}

impl DebateScript {
    /// Load a script, picking JSON for `.json` files and TOML otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.turns.is_empty() {
            return Err(ScriptError::NoTurns);
        }
        if let Some(index) = self
            .turns
            .iter()
            .position(|t| t.dialogue.trim().is_empty())
        {
            return Err(ScriptError::EmptyDialogue(index + 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
topic = "Should cities ban private cars?"
personas = ["urbanist", "trucker"]

[[turns]]
persona = "urbanist"
move = "CLAIM"
dialogue = "Cars choke our streets."
tokens = { input_tokens = 10, output_tokens = 4 }
crystallization = { new_args = [{ id = "u1", claim = "Cars choke streets" }] }

[[turns]]
move = "PROPOSE_CRUX"
dialogue = "It comes down to induced demand."
crux = "Does road space induce demand?"

[[turns]]
move = "CLARIFY"
dialogue = "Yes, that is the question."
acknowledges_crux = true
crux = { statement = "Does road space induce demand?", assumptions = ["traffic adapts"] }
"#;

    #[test]
    fn test_parse_toml_script() {
        let script = DebateScript::from_toml_str(SCRIPT).unwrap();
        assert_eq!(script.topic.as_deref(), Some("Should cities ban private cars?"));
        assert_eq!(script.personas.len(), 2);
        assert_eq!(script.turns.len(), 3);

        let first = &script.turns[0];
        assert_eq!(first.move_type, Move::Claim);
        assert_eq!(first.tokens, TokenUsage::new(10, 4));
        assert_eq!(
            first.crystallization.as_ref().unwrap()["new_args"][0]["id"],
            "u1"
        );

        assert_eq!(
            script.turns[1].crux.as_ref().unwrap().to_proposal(),
            CruxProposal::new("Does road space induce demand?")
        );
        let full = script.turns[2].crux.as_ref().unwrap().to_proposal();
        assert!(full.assumptions.contains("traffic adapts"));
        assert!(script.turns[2].acknowledges_crux);
    }

    #[test]
    fn test_parse_json_script() {
        let script = DebateScript::from_json_str(
            r#"{"turns": [{"move": "CHALLENGE", "dialogue": "Not so.", "crystallization": "```json\n{}\n```"}]}"#,
        )
        .unwrap();
        assert!(script.topic.is_none());
        assert_eq!(script.turns[0].move_type, Move::Challenge);
        assert!(script.turns[0].crystallization.as_ref().unwrap().is_string());
    }

    #[test]
    fn test_empty_script_is_rejected() {
        assert!(matches!(
            DebateScript::from_toml_str("topic = \"x\""),
            Err(ScriptError::NoTurns)
        ));
    }

    #[test]
    fn test_blank_dialogue_is_rejected() {
        let result = DebateScript::from_toml_str(
            "[[turns]]\nmove = \"CLAIM\"\ndialogue = \"ok\"\n[[turns]]\nmove = \"CLAIM\"\ndialogue = \" \"\n",
        );
        assert!(matches!(result, Err(ScriptError::EmptyDialogue(2))));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.toml");
        std::fs::write(&path, SCRIPT).unwrap();
        assert_eq!(DebateScript::from_path(&path).unwrap().turns.len(), 3);

        let missing = DebateScript::from_path(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ScriptError::Io { .. })));
    }
}
