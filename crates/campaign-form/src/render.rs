use serde::Serialize;
use serde_json::{Value, json};

use crate::answers::{AnswerState, ErrorState};
use crate::catalog::Brand;
use crate::field::{BoundField, FieldInput, bind_field};
use crate::spec::form::FormSchema;
use crate::validate::visible_questions;

/// Shown in place of fields when every question of a step is hidden.
pub const EMPTY_STEP_MESSAGE: &str = "No hay preguntas para este paso";

const STEP_TITLES: [&str; 5] = [
    "Información básica",
    "Presupuesto y contenido",
    "Materiales creativos",
    "Detalles adicionales",
    "Finalizar solicitud",
];

/// Heading of `step`; steps past the fixed table fall back to `Paso <n>`.
pub fn step_title(step: u32) -> String {
    step.checked_sub(1)
        .and_then(|index| STEP_TITLES.get(index as usize))
        .map(|title| title.to_string())
        .unwrap_or_else(|| format!("Paso {step}"))
}

/// Everything needed to draw one wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub brand: String,
    pub step: u32,
    pub total_steps: u32,
    pub title: String,
    pub progress_percent: u32,
    pub fields: Vec<BoundField>,
    /// The forward action submits instead of moving on.
    pub is_last: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

pub fn build_step_view(
    schema: &FormSchema,
    step: u32,
    brand: &Brand,
    answers: &AnswerState,
    errors: &ErrorState,
    models: &[String],
) -> StepView {
    let total_steps = schema.total_steps().max(1);
    let fields = visible_questions(schema, step, answers)
        .into_iter()
        .map(|question| bind_field(question, answers, errors, models))
        .collect();

    StepView {
        brand: brand.name.clone(),
        step,
        total_steps,
        title: step_title(step),
        progress_percent: progress_percent(step, total_steps),
        fields,
        is_last: step >= total_steps,
        notice: None,
    }
}

fn progress_percent(step: u32, total_steps: u32) -> u32 {
    (f64::from(step) / f64::from(total_steps) * 100.0).round() as u32
}

/// Render the step as a structured JSON value.
pub fn render_json(view: &StepView) -> Value {
    let mut value = json!(view);
    if view.fields.is_empty()
        && let Some(map) = value.as_object_mut()
    {
        map.insert("empty".into(), Value::String(EMPTY_STEP_MESSAGE.into()));
    }
    value
}

/// Render the step as human-friendly text.
pub fn render_text(view: &StepView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} | Paso {} de {} ({}%)",
        view.brand, view.step, view.total_steps, view.progress_percent
    ));
    lines.push(view.title.clone());
    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    if view.fields.is_empty() {
        lines.push(format!("  {EMPTY_STEP_MESSAGE}"));
    }
    for field in &view.fields {
        let marker = if field.required { " *" } else { "" };
        let mut entry = format!(" - {}{}", field.prompt_or_name(), marker);
        if let Some(value) = input_display(&field.input) {
            entry.push_str(&format!(" = {value}"));
        }
        lines.push(entry);
        if let Some(choices) = input_choices(&field.input) {
            lines.push(format!("   [{choices}]"));
        }
        if let Some(error) = &field.error {
            lines.push(format!("   error: {error}"));
        }
        if let Some(help) = &field.help {
            lines.push(format!("   {help}"));
        }
    }

    lines.join("\n")
}

fn input_display(input: &FieldInput) -> Option<String> {
    let value = match input {
        FieldInput::Text { value, .. }
        | FieldInput::Number { value, .. }
        | FieldInput::Date { value }
        | FieldInput::TextArea { value, .. } => value.clone(),
        FieldInput::Buttons { selected, .. } | FieldInput::Dropdown { selected, .. } => {
            selected.clone().unwrap_or_default()
        }
        FieldInput::MultiToggle { toggles } => toggles
            .iter()
            .filter(|toggle| toggle.selected)
            .map(|toggle| toggle.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    };
    (!value.is_empty()).then_some(value)
}

fn input_choices(input: &FieldInput) -> Option<String> {
    match input {
        FieldInput::Buttons { options, .. } | FieldInput::Dropdown { options, .. } => {
            Some(options.join(" | "))
        }
        FieldInput::MultiToggle { toggles } => Some(
            toggles
                .iter()
                .map(|toggle| {
                    let mark = if toggle.selected { "x" } else { " " };
                    format!("[{mark}] {}", toggle.label)
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::REQUIRED_MESSAGE;
    use crate::spec::question::{FieldKind, Question};

    fn schema() -> FormSchema {
        FormSchema::from_questions(
            vec![
                Question::new("texto_anuncio", FieldKind::TextArea)
                    .with_step(1)
                    .with_prompt("Texto del anuncio")
                    .required(),
                Question::new("formato", FieldKind::Radio)
                    .with_step(1)
                    .with_prompt("Formato")
                    .with_options("Video, Imagen"),
                Question::new("duracion", FieldKind::Number)
                    .with_step(2)
                    .with_condition("formato=Video"),
            ],
            3,
        )
    }

    #[test]
    fn titles_fall_back_past_the_table() {
        assert_eq!(step_title(1), "Información básica");
        assert_eq!(step_title(5), "Finalizar solicitud");
        assert_eq!(step_title(6), "Paso 6");
        assert_eq!(step_title(0), "Paso 0");
    }

    #[test]
    fn progress_is_rounded() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn text_shows_values_and_errors() {
        let brand = Brand::new("M-1", "Ford", "Digital");
        let mut answers = AnswerState::new();
        answers.set("formato", "Video".into());
        let mut errors = ErrorState::new();
        errors.insert("texto_anuncio", REQUIRED_MESSAGE);

        let view = build_step_view(&schema(), 1, &brand, &answers, &errors, &[]);
        assert!(!view.is_last);
        let text = render_text(&view);
        assert!(text.starts_with("Ford | Paso 1 de 3 (33%)"));
        assert!(text.contains(" - Texto del anuncio *"));
        assert!(text.contains("   error: Este campo es obligatorio"));
        assert!(text.contains(" - Formato = Video"));
        assert!(text.contains("[Video | Imagen]"));
    }

    #[test]
    fn hidden_only_step_renders_empty_notice() {
        let brand = Brand::new("M-1", "Ford", "Digital");
        let view = build_step_view(
            &schema(),
            2,
            &brand,
            &AnswerState::new(),
            &ErrorState::new(),
            &[],
        );
        assert!(view.fields.is_empty());
        assert!(render_text(&view).contains(EMPTY_STEP_MESSAGE));
        assert_eq!(render_json(&view)["empty"], EMPTY_STEP_MESSAGE);
        assert_eq!(render_json(&view)["progress_percent"], 67);
    }
}
