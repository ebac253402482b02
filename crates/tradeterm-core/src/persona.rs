//! Persona template and conversation turn types.
//!
//! The persona template is the fixed seed conversation that establishes the
//! assistant's tone. It is loaded once and shared by reference across resets.

use serde::{Deserialize, Serialize};

/// Role of a single turn in a conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Turn authored by the user.
    User,
    /// Turn authored by the model.
    Model,
}

/// One role-tagged message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            content: content.into(),
        }
    }
}

/// Fixed seed conversation plus the instruction used when elaborating on a
/// local definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTemplate {
    turns: Vec<ChatTurn>,
    elaboration_instruction: Option<String>,
}

impl PersonaTemplate {
    pub fn new(turns: Vec<ChatTurn>) -> Self {
        Self {
            turns,
            elaboration_instruction: None,
        }
    }

    /// Sets an explicit elaboration instruction. Blank values are ignored.
    pub fn with_elaboration_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.elaboration_instruction = if instruction.trim().is_empty() {
            None
        } else {
            Some(instruction)
        };
        self
    }

    /// Minimal template used when the persona file cannot be loaded.
    pub fn fallback() -> Self {
        Self::new(vec![ChatTurn::user("Basic AI."), ChatTurn::model("Hi.")])
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Text of the trailing model turn, surfaced as the greeting.
    pub fn greeting(&self) -> Option<&str> {
        self.turns
            .last()
            .filter(|turn| turn.role == TurnRole::Model)
            .map(|turn| turn.content.as_str())
    }

    /// Instruction appended to prompts built from a local definition.
    ///
    /// Falls back to the first user turn of the template, then to the empty
    /// string when the template has no user turn.
    pub fn elaboration_instruction(&self) -> &str {
        if let Some(instruction) = &self.elaboration_instruction {
            return instruction;
        }
        self.turns
            .iter()
            .find(|turn| turn.role == TurnRole::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or("")
    }
}
