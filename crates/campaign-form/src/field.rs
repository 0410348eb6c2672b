use serde::Serialize;

use crate::answers::{AnswerState, AnswerValue, ErrorState, REQUIRED_MESSAGE};
use crate::error::FormError;
use crate::spec::question::{FieldKind, Question};

/// Placeholder shown on number inputs that do not define one.
pub const NUMBER_PLACEHOLDER: &str = "Ej: 50000";
/// First, empty entry of a dropdown.
pub const DROPDOWN_PROMPT: &str = "Selecciona una opción...";
const TEXTAREA_ROWS: u8 = 4;

/// One option of a multi-choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub label: String,
    pub selected: bool,
}

/// Input abstraction bound to the current value of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldInput {
    Text {
        value: String,
        placeholder: String,
    },
    Number {
        value: String,
        placeholder: String,
    },
    Date {
        value: String,
    },
    TextArea {
        value: String,
        placeholder: String,
        rows: u8,
    },
    Buttons {
        options: Vec<String>,
        selected: Option<String>,
    },
    Dropdown {
        prompt: String,
        options: Vec<String>,
        selected: Option<String>,
    },
    MultiToggle {
        toggles: Vec<Toggle>,
    },
}

/// A question ready to be drawn: prompt, input, and any pending error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundField {
    pub field: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub required: bool,
    pub input: FieldInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BoundField {
    /// Label to show; rows without a prompt fall back to the field name.
    pub fn prompt_or_name(&self) -> &str {
        if self.prompt.trim().is_empty() {
            &self.field
        } else {
            &self.prompt
        }
    }
}

/// A change requested through a bound field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Replace the scalar value (text-like inputs, button or dropdown choice).
    Set(String),
    /// Flip one option of a multi-choice list.
    Toggle(String),
    Clear,
}

pub fn bind_field(
    question: &Question,
    answers: &AnswerState,
    errors: &ErrorState,
    models: &[String],
) -> BoundField {
    let scalar = || answers.text(&question.field).unwrap_or_default().to_string();
    let placeholder = || question.placeholder.clone().unwrap_or_default();
    let chosen = || {
        answers
            .text(&question.field)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    };

    let input = match &question.kind {
        FieldKind::Text | FieldKind::Unknown(_) => FieldInput::Text {
            value: scalar(),
            placeholder: placeholder(),
        },
        FieldKind::Number => FieldInput::Number {
            value: scalar(),
            placeholder: question
                .placeholder
                .clone()
                .unwrap_or_else(|| NUMBER_PLACEHOLDER.to_string()),
        },
        FieldKind::Date => FieldInput::Date { value: scalar() },
        FieldKind::TextArea => FieldInput::TextArea {
            value: scalar(),
            placeholder: placeholder(),
            rows: TEXTAREA_ROWS,
        },
        FieldKind::Radio => FieldInput::Buttons {
            options: question.resolved_options(models),
            selected: chosen(),
        },
        FieldKind::Dropdown => FieldInput::Dropdown {
            prompt: DROPDOWN_PROMPT.to_string(),
            options: question.resolved_options(models),
            selected: chosen(),
        },
        FieldKind::MultiSelect => {
            let selected = answers.selection(&question.field);
            FieldInput::MultiToggle {
                toggles: question
                    .resolved_options(models)
                    .into_iter()
                    .map(|label| Toggle {
                        selected: selected.contains(&label),
                        label,
                    })
                    .collect(),
            }
        }
    };

    BoundField {
        field: question.field.clone(),
        prompt: question.prompt.clone(),
        help: question.help.clone(),
        required: question.required,
        input,
        error: errors.get(&question.field).map(ToOwned::to_owned),
    }
}

/// Writes `edit` into `answers` after checking it fits the field type.
pub fn apply_edit(
    question: &Question,
    models: &[String],
    answers: &mut AnswerState,
    edit: FieldEdit,
) -> Result<(), FormError> {
    match edit {
        FieldEdit::Clear => {
            answers.remove(&question.field);
        }
        FieldEdit::Set(value) => {
            if question.kind.is_multi_choice() {
                return Err(FormError::InvalidAnswers(format!(
                    "'{}' takes a selection, not text",
                    question.field
                )));
            }
            if question.kind.is_single_choice() {
                ensure_option(question, models, &value)?;
            }
            answers.set(&question.field, AnswerValue::Text(value));
        }
        FieldEdit::Toggle(option) => {
            if !question.kind.is_multi_choice() {
                return Err(FormError::NotMultiChoice(question.field.clone()));
            }
            ensure_option(question, models, &option)?;
            answers.toggle(&question.field, &option);
        }
    }
    Ok(())
}

fn ensure_option(question: &Question, models: &[String], option: &str) -> Result<(), FormError> {
    if question
        .resolved_options(models)
        .iter()
        .any(|candidate| candidate == option)
    {
        Ok(())
    } else {
        Err(FormError::UnknownOption {
            field: question.field.clone(),
            option: option.to_string(),
        })
    }
}

/// Presence check for a required question; `None` when satisfied.
pub fn required_error(question: &Question, answers: &AnswerState) -> Option<&'static str> {
    if !question.required {
        return None;
    }
    match answers.get(&question.field) {
        Some(value) if !value.is_empty() => None,
        _ => Some(REQUIRED_MESSAGE),
    }
}
