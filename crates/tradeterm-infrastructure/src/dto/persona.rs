//! Persona file DTOs.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [{"role": "user", "parts": [{"text": "..."}]}, {"role": "model", "parts": [{"text": "..."}]}]
//! ```
//!
//! and
//!
//! ```json
//! {"elaboration_instruction": "...", "history": [ ...turns as above... ]}
//! ```

use serde::Deserialize;
use tradeterm_core::persona::{ChatTurn, PersonaTemplate, TurnRole};

#[derive(Debug, Clone, Deserialize)]
pub struct PartDto {
    #[serde(default)]
    pub text: Option<String>,
}

/// One turn as stored in the persona file.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnDto {
    pub role: TurnRole,
    #[serde(default)]
    pub parts: Vec<PartDto>,
}

impl TurnDto {
    /// Joins the text parts with newlines.
    fn into_domain(self) -> ChatTurn {
        let content = self
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");
        ChatTurn {
            role: self.role,
            content,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PersonaFileDto {
    Structured {
        #[serde(default)]
        elaboration_instruction: Option<String>,
        history: Vec<TurnDto>,
    },
    Legacy(Vec<TurnDto>),
}

impl PersonaFileDto {
    pub fn into_domain(self) -> PersonaTemplate {
        match self {
            PersonaFileDto::Legacy(turns) => {
                PersonaTemplate::new(turns.into_iter().map(TurnDto::into_domain).collect())
            }
            PersonaFileDto::Structured {
                elaboration_instruction,
                history,
            } => {
                let template =
                    PersonaTemplate::new(history.into_iter().map(TurnDto::into_domain).collect());
                match elaboration_instruction {
                    Some(instruction) => template.with_elaboration_instruction(instruction),
                    None => template,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_shape() {
        let json = r#"[
            {"role": "user", "parts": [{"text": "You are a trading tutor."}, {"text": "Keep it short."}]},
            {"role": "model", "parts": [{"text": "Hi! Ask me anything."}]}
        ]"#;
        let template = serde_json::from_str::<PersonaFileDto>(json)
            .unwrap()
            .into_domain();

        assert_eq!(template.turns().len(), 2);
        assert_eq!(
            template.turns()[0],
            ChatTurn::user("You are a trading tutor.\nKeep it short.")
        );
        assert_eq!(template.greeting(), Some("Hi! Ask me anything."));
        assert_eq!(
            template.elaboration_instruction(),
            "You are a trading tutor.\nKeep it short."
        );
    }

    #[test]
    fn test_structured_shape_with_instruction() {
        let json = r#"{
            "elaboration_instruction": "Expand with one example.",
            "history": [
                {"role": "user", "parts": [{"text": "Tutor persona."}]},
                {"role": "model", "parts": [{"text": "Ready."}]}
            ]
        }"#;
        let template = serde_json::from_str::<PersonaFileDto>(json)
            .unwrap()
            .into_domain();

        assert_eq!(template.elaboration_instruction(), "Expand with one example.");
        assert_eq!(template.greeting(), Some("Ready."));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"[{"role": "system", "parts": [{"text": "x"}]}]"#;
        assert!(serde_json::from_str::<PersonaFileDto>(json).is_err());
    }
}
