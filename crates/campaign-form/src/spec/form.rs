use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::spec::cell;
use crate::spec::question::Question;

/// Form definition exactly as `getFormulario` returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default)]
    pub preguntas: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pasos: Option<BTreeMap<String, Vec<Question>>>,
    #[serde(rename = "totalPasos", default, skip_serializing_if = "Option::is_none")]
    pub total_pasos: Option<Value>,
}

/// Normalized schema the wizard runs on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
    questions: Vec<Question>,
    steps: BTreeMap<u32, Vec<Question>>,
    total_steps: u32,
}

impl FormSchema {
    /// Builds a schema from questions that carry their own step number.
    pub fn from_questions(questions: Vec<Question>, total_steps: u32) -> Self {
        FormSchema::from_document(FormDocument {
            preguntas: questions,
            pasos: None,
            total_pasos: Some(Value::from(total_steps)),
        })
    }

    pub fn from_document(document: FormDocument) -> Self {
        let mut steps: BTreeMap<u32, Vec<Question>> = BTreeMap::new();
        let mut placed = BTreeSet::new();

        match document.pasos {
            Some(groups) => {
                for (key, questions) in groups {
                    let Some(step) = cell::step_number(&Value::String(key.clone())) else {
                        warn!(step = %key, "dropping step group with a non-numeric key");
                        continue;
                    };
                    for question in questions {
                        if first_placement(&mut placed, &question) {
                            steps.entry(step.max(1)).or_default().push(question);
                        }
                    }
                }
            }
            None => {
                for question in &document.preguntas {
                    if first_placement(&mut placed, question) {
                        let step = question.step.unwrap_or(1).max(1);
                        steps.entry(step).or_default().push(question.clone());
                    }
                }
            }
        }

        let total_steps = document
            .total_pasos
            .as_ref()
            .and_then(cell::step_number)
            .unwrap_or(1)
            .max(1);

        FormSchema {
            questions: document.preguntas,
            steps,
            total_steps,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions of `step` in schema order, before any visibility filtering.
    pub fn step_questions(&self, step: u32) -> &[Question] {
        self.steps.get(&step).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_configured(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn question(&self, field: &str) -> Option<&Question> {
        self.placed()
            .chain(self.questions.iter())
            .find(|question| question.field == field)
    }

    /// Every placed question writing to `field`, in step order.
    pub fn questions_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Question> {
        self.placed().filter(move |question| question.field == field)
    }

    fn placed(&self) -> impl Iterator<Item = &Question> {
        self.steps.values().flatten()
    }
}

/// Rows sharing an `ID_Pregunta` are placed once; rows without one always are.
fn first_placement(placed: &mut BTreeSet<String>, question: &Question) -> bool {
    match &question.id {
        Some(id) => placed.insert(id.clone()),
        None => true,
    }
}
