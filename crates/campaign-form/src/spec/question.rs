use serde::{Deserialize, Serialize};

use crate::spec::cell;

/// Options value meaning "offer the brand's model catalog".
pub const MODELS_SENTINEL: &str = "FROM_MODELOS";

/// Supported field types, keyed by the sheet's `Tipo_Campo` tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    TextArea,
    /// Single choice rendered as a row of buttons.
    Radio,
    /// Single choice rendered as a select box.
    Dropdown,
    MultiSelect,
    /// Any tag this client does not know; rendered as plain text.
    Unknown(String),
}

impl FieldKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "text" | "" => FieldKind::Text,
            "number" => FieldKind::Number,
            "date" => FieldKind::Date,
            "textarea" => FieldKind::TextArea,
            "radio" => FieldKind::Radio,
            "dropdown" => FieldKind::Dropdown,
            "multiselect" => FieldKind::MultiSelect,
            other => FieldKind::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::TextArea => "textarea",
            FieldKind::Radio => "radio",
            FieldKind::Dropdown => "dropdown",
            FieldKind::MultiSelect => "multiselect",
            FieldKind::Unknown(tag) => tag,
        }
    }

    pub fn is_single_choice(&self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::Dropdown)
    }

    pub fn is_multi_choice(&self) -> bool {
        matches!(self, FieldKind::MultiSelect)
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        FieldKind::from_tag(&tag)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.tag().to_string()
    }
}

/// Where a choice field takes its options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    Literal(Vec<String>),
    Models,
}

/// One schema-defined input of the dynamic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(
        rename = "ID_Pregunta",
        default,
        deserialize_with = "cell::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "Paso",
        default,
        deserialize_with = "cell::step",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<u32>,
    #[serde(rename = "Nombre_Campo", deserialize_with = "cell::string")]
    pub field: String,
    #[serde(rename = "Tipo_Campo", default, deserialize_with = "kind_cell")]
    pub kind: FieldKind,
    #[serde(rename = "Pregunta", default, deserialize_with = "cell::string")]
    pub prompt: String,
    #[serde(
        rename = "Placeholder",
        default,
        deserialize_with = "cell::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub placeholder: Option<String>,
    #[serde(
        rename = "Ayuda",
        default,
        deserialize_with = "cell::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub help: Option<String>,
    #[serde(
        rename = "Obligatorio",
        default,
        deserialize_with = "cell::flag",
        serialize_with = "cell::serialize_flag"
    )]
    pub required: bool,
    #[serde(
        rename = "Opciones",
        default,
        deserialize_with = "cell::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub options: Option<String>,
    #[serde(
        rename = "Condicion",
        default,
        deserialize_with = "cell::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,
}

impl Question {
    pub fn new(field: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: None,
            step: None,
            field: field.into(),
            kind,
            prompt: String::new(),
            placeholder: None,
            help: None,
            required: false,
            options: None,
            condition: None,
        }
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn options_source(&self) -> OptionsSource {
        match self.options.as_deref().map(str::trim) {
            Some(MODELS_SENTINEL) => OptionsSource::Models,
            Some(raw) => OptionsSource::Literal(split_options(raw)),
            None => OptionsSource::Literal(Vec::new()),
        }
    }

    /// Options offered to the user, resolving the model sentinel against `models`.
    pub fn resolved_options(&self, models: &[String]) -> Vec<String> {
        match self.options_source() {
            OptionsSource::Literal(options) => options,
            OptionsSource::Models => models.to_vec(),
        }
    }
}

fn kind_cell<'de, D>(deserializer: D) -> Result<FieldKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    cell::string(deserializer).map(FieldKind::from)
}

fn split_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
