use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::spec::cell;

/// Message recorded for a required field left empty.
pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";

/// A single answer: scalar text or an ordered, duplicate-free selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Selection(Vec<String>),
}

impl AnswerValue {
    /// Absent-equivalent: empty text or nothing selected.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.is_empty(),
            AnswerValue::Selection(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Selection(_) => None,
        }
    }

    pub fn as_selection(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Text(_) => None,
            AnswerValue::Selection(items) => Some(items),
        }
    }

    /// Flattened display form; selections are joined with `, `.
    pub fn to_display(&self) -> String {
        match self {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Selection(items) => items.join(", "),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::Text(text)
    }
}

/// In-progress answers keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerState(BTreeMap<String, AnswerValue>);

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON object of prefilled answers.
    ///
    /// Scalars are kept as text without coercion, arrays become selections and
    /// `null` entries are skipped.
    pub fn from_json(value: &Value) -> Result<Self, FormError> {
        let object = value
            .as_object()
            .ok_or_else(|| FormError::InvalidAnswers("expected a JSON object".into()))?;
        let mut state = AnswerState::new();
        for (field, raw) in object {
            match raw {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        let option = cell::text_of(item.clone()).ok_or_else(|| {
                            FormError::InvalidAnswers(format!("null entry in '{field}'"))
                        })?;
                        state.select(field, &option);
                    }
                    state
                        .0
                        .entry(field.clone())
                        .or_insert_with(|| AnswerValue::Selection(Vec::new()));
                }
                Value::Object(_) => {
                    return Err(FormError::InvalidAnswers(format!(
                        "'{field}' must be text or a list"
                    )));
                }
                scalar => {
                    let text = cell::text_of(scalar.clone()).unwrap_or_default();
                    state.set(field, AnswerValue::Text(text));
                }
            }
        }
        Ok(state)
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(AnswerValue::as_text)
    }

    pub fn selection(&self, field: &str) -> &[String] {
        self.get(field)
            .and_then(AnswerValue::as_selection)
            .unwrap_or_default()
    }

    pub fn set(&mut self, field: &str, value: AnswerValue) {
        self.0.insert(field.to_string(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<AnswerValue> {
        self.0.remove(field)
    }

    /// Adds `option` if missing, removes it otherwise. A non-list value is
    /// replaced by a fresh selection.
    pub fn toggle(&mut self, field: &str, option: &str) {
        let mut selected = self.selection(field).to_vec();
        if let Some(pos) = selected.iter().position(|item| item == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_string());
        }
        self.set(field, AnswerValue::Selection(selected));
    }

    fn select(&mut self, field: &str, option: &str) {
        if !self.selection(field).iter().any(|item| item == option) {
            self.toggle(field, option);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn to_json(&self) -> Value {
        let map = self
            .0
            .iter()
            .map(|(field, value)| {
                let json = match value {
                    AnswerValue::Text(text) => Value::String(text.clone()),
                    AnswerValue::Selection(items) => {
                        Value::Array(items.iter().cloned().map(Value::String).collect())
                    }
                };
                (field.clone(), json)
            })
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorState(BTreeMap<String, String>);

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}
