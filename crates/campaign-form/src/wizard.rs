//! Wizard controller.
//!
//! One [`Wizard`] owns the whole state of a form fill: current step, answers,
//! validation errors and the submission in flight. Callers feed it events
//! (`edit`, `advance`, `back`, `complete_submission`) and draw whatever
//! [`Wizard::view`] returns.

use tracing::{debug, info, warn};

use crate::answers::{AnswerState, ErrorState};
use crate::backend::{BackendFailure, RequestStore};
use crate::catalog::{Brand, User};
use crate::condition::visible;
use crate::error::FormError;
use crate::field::{FieldEdit, apply_edit};
use crate::loader::LoadedSchema;
use crate::render::{StepView, build_step_view};
use crate::spec::form::FormSchema;
use crate::spec::question::Question;
use crate::submission::{SubmissionEnvelope, SubmittedRequest, assemble};
use crate::validate::{validate_step, visible_questions};

/// Message shown when the store rejects a request without saying why.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Intenta de nuevo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Schema fetch in flight.
    Loading,
    /// The brand has no questions; only `back` applies.
    NotConfigured,
    Ready,
    Submitting,
    Done(SubmittedRequest),
    /// Left through `back` on the first step.
    Exited,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::NotConfigured => "not_configured",
            Phase::Ready => "ready",
            Phase::Submitting => "submitting",
            Phase::Done(_) => "done",
            Phase::Exited => "exited",
        }
    }
}

/// Result of a navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to `step`; the caller resets its scroll position.
    Moved { step: u32 },
    /// Validation failed; the wizard stays on the current step.
    Blocked(ErrorState),
    /// The last step validated; the envelope must now be sent to the store.
    Submit(SubmissionEnvelope),
    Submitted(SubmittedRequest),
    /// The store rejected the request; the message is user-displayable.
    SubmitFailed(String),
    Exited,
}

impl Transition {
    pub fn scrolls_to_top(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

pub struct Wizard {
    user: User,
    brand: Brand,
    schema: FormSchema,
    models: Vec<String>,
    phase: Phase,
    step: u32,
    answers: AnswerState,
    errors: ErrorState,
    last_error: Option<String>,
    pending: Option<SubmissionEnvelope>,
}

impl Wizard {
    pub fn new(user: User, brand: Brand) -> Self {
        Self {
            user,
            brand,
            schema: FormSchema::default(),
            models: Vec::new(),
            phase: Phase::Loading,
            step: 1,
            answers: AnswerState::new(),
            errors: ErrorState::new(),
            last_error: None,
            pending: None,
        }
    }

    /// Ends the loading phase with the fetched schema.
    pub fn apply_schema(&mut self, loaded: LoadedSchema) -> Result<(), FormError> {
        if self.phase != Phase::Loading {
            return Err(FormError::InvalidState("schema already applied"));
        }
        let configured = loaded.is_configured();
        self.schema = loaded.schema;
        self.models = loaded.models;
        self.step = 1;
        self.phase = if configured {
            Phase::Ready
        } else {
            Phase::NotConfigured
        };
        debug!(brand = %self.brand.name, phase = self.phase.as_str(), "wizard entered");
        Ok(())
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn total_steps(&self) -> u32 {
        self.schema.total_steps().max(1)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    /// Message of the last rejected submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current step with bound fields, values and errors.
    pub fn view(&self) -> StepView {
        let mut view = build_step_view(
            &self.schema,
            self.step,
            &self.brand,
            &self.answers,
            &self.errors,
            &self.models,
        );
        view.notice = self.last_error.clone();
        view
    }

    /// Writes one field and clears its pending error.
    pub fn edit(&mut self, field: &str, edit: FieldEdit) -> Result<(), FormError> {
        self.ensure_ready("edit")?;
        let question = edit_target(&self.schema, self.step, &self.answers, field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        apply_edit(question, &self.models, &mut self.answers, edit)?;
        self.errors.clear_field(field);
        self.last_error = None;
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Transition, FormError> {
        self.ensure_ready("advance")?;

        self.errors = validate_step(&self.schema, self.step, &self.answers);
        if !self.errors.is_empty() {
            debug!(step = self.step, errors = self.errors.len(), "step blocked");
            return Ok(Transition::Blocked(self.errors.clone()));
        }

        if self.step < self.total_steps() {
            self.step += 1;
            self.last_error = None;
            debug!(step = self.step, "moved forward");
            return Ok(Transition::Moved { step: self.step });
        }

        let envelope = assemble(&self.user, &self.brand, &self.answers);
        self.pending = Some(envelope.clone());
        self.last_error = None;
        self.phase = Phase::Submitting;
        info!(brand = %self.brand.name, answers = self.answers.len(), "submitting request");
        Ok(Transition::Submit(envelope))
    }

    pub fn back(&mut self) -> Result<Transition, FormError> {
        match self.phase {
            Phase::Submitting => Err(FormError::Busy),
            Phase::Ready if self.step > 1 => {
                self.step -= 1;
                self.last_error = None;
                debug!(step = self.step, "moved back");
                Ok(Transition::Moved { step: self.step })
            }
            Phase::Ready | Phase::Loading | Phase::NotConfigured => {
                self.answers.clear();
                self.errors.clear();
                self.phase = Phase::Exited;
                debug!(brand = %self.brand.name, "wizard exited");
                Ok(Transition::Exited)
            }
            Phase::Done(_) | Phase::Exited => Err(FormError::InvalidState("wizard already finished")),
        }
    }

    /// Resolves the submission started by the last `advance`.
    pub fn complete_submission(
        &mut self,
        outcome: Result<String, BackendFailure>,
    ) -> Result<Transition, FormError> {
        if self.phase != Phase::Submitting {
            return Err(FormError::InvalidState("no submission in flight"));
        }
        let envelope = self
            .pending
            .take()
            .ok_or(FormError::InvalidState("no submission in flight"))?;

        match outcome {
            Ok(number) => {
                info!(number = %number, "request created");
                let submitted = SubmittedRequest { envelope, number };
                self.answers.clear();
                self.errors.clear();
                self.phase = Phase::Done(submitted.clone());
                Ok(Transition::Submitted(submitted))
            }
            Err(failure) => {
                let message = if failure.message.trim().is_empty() {
                    SUBMIT_FALLBACK_MESSAGE.to_string()
                } else {
                    failure.message
                };
                warn!(error = %message, "request rejected");
                self.phase = Phase::Ready;
                self.last_error = Some(message.clone());
                Ok(Transition::SubmitFailed(message))
            }
        }
    }

    /// `advance`, sending the envelope to `store` when the last step passes.
    pub async fn advance_with<S>(&mut self, store: &S) -> Result<Transition, FormError>
    where
        S: RequestStore + ?Sized,
    {
        match self.advance()? {
            Transition::Submit(envelope) => {
                let outcome = store.create_request(&envelope).await;
                self.complete_submission(outcome)
            }
            other => Ok(other),
        }
    }

    fn ensure_ready(&self, event: &'static str) -> Result<(), FormError> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Submitting => Err(FormError::Busy),
            _ => Err(FormError::InvalidState(event)),
        }
    }
}

/// Question an edit of `field` applies to. Several rows may share a field
/// name under different conditions; the one visible on the current step
/// wins, then any visible one, then the first declared.
fn edit_target<'a>(
    schema: &'a FormSchema,
    step: u32,
    answers: &AnswerState,
    field: &'a str,
) -> Option<&'a Question> {
    visible_questions(schema, step, answers)
        .into_iter()
        .find(|question| question.field == field)
        .or_else(|| {
            schema
                .questions_for(field)
                .find(|question| visible(question.condition.as_deref(), answers))
        })
        .or_else(|| schema.question(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::question::FieldKind;

    fn wizard(total: u32) -> Wizard {
        let mut wizard = Wizard::new(
            User::new("U-1", "Ana Gómez"),
            Brand::new("M-1", "Ford", "Digital"),
        );
        let schema = FormSchema::from_questions(
            vec![
                Question::new("texto_anuncio", FieldKind::TextArea)
                    .with_step(1)
                    .required(),
                Question::new("comentarios", FieldKind::TextArea).with_step(total),
            ],
            total,
        );
        wizard
            .apply_schema(LoadedSchema {
                schema,
                models: Vec::new(),
            })
            .unwrap();
        wizard
    }

    #[test]
    fn events_before_load_are_rejected() {
        let mut wizard = Wizard::new(User::new("U-1", "Ana"), Brand::new("M", "Ford", ""));
        assert_eq!(wizard.advance(), Err(FormError::InvalidState("advance")));
        assert_eq!(wizard.back(), Ok(Transition::Exited));
    }

    #[test]
    fn empty_schema_is_not_configured() {
        let mut wizard = Wizard::new(User::new("U-1", "Ana"), Brand::new("M", "Ford", ""));
        wizard.apply_schema(LoadedSchema::default()).unwrap();
        assert_eq!(wizard.phase(), &Phase::NotConfigured);
        assert!(matches!(wizard.advance(), Err(FormError::InvalidState(_))));
        assert_eq!(wizard.back(), Ok(Transition::Exited));
    }

    #[test]
    fn submitting_blocks_every_other_event() {
        let mut wizard = wizard(1);
        wizard.edit("texto_anuncio", FieldEdit::Set("Hola".into())).unwrap();
        assert!(matches!(wizard.advance(), Ok(Transition::Submit(_))));
        assert_eq!(wizard.advance(), Err(FormError::Busy));
        assert_eq!(wizard.back(), Err(FormError::Busy));
        assert_eq!(
            wizard.edit("texto_anuncio", FieldEdit::Clear),
            Err(FormError::Busy)
        );
    }

    #[test]
    fn back_moves_then_exits_and_drops_answers() {
        let mut wizard = wizard(2);
        wizard.edit("texto_anuncio", FieldEdit::Set("Hola".into())).unwrap();
        assert_eq!(wizard.advance(), Ok(Transition::Moved { step: 2 }));
        assert!(wizard.back().unwrap().scrolls_to_top());
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.back(), Ok(Transition::Exited));
        assert!(wizard.answers().is_empty());
        assert!(matches!(wizard.back(), Err(FormError::InvalidState(_))));
    }

    #[test]
    fn empty_failure_message_falls_back() {
        let mut wizard = wizard(1);
        wizard.edit("texto_anuncio", FieldEdit::Set("Hola".into())).unwrap();
        wizard.advance().unwrap();
        let transition = wizard
            .complete_submission(Err(BackendFailure::new("")))
            .unwrap();
        assert_eq!(transition, Transition::SubmitFailed(SUBMIT_FALLBACK_MESSAGE.into()));
        assert_eq!(wizard.phase(), &Phase::Ready);
        assert_eq!(wizard.view().notice.as_deref(), Some(SUBMIT_FALLBACK_MESSAGE));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut wizard = wizard(1);
        assert_eq!(
            wizard.edit("nope", FieldEdit::Set("x".into())),
            Err(FormError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn notice_clears_once_the_user_moves_on() {
        let mut wizard = wizard(2);
        wizard.edit("texto_anuncio", FieldEdit::Set("Hola".into())).unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard
            .complete_submission(Err(BackendFailure::new("quota exceeded")))
            .unwrap();
        assert_eq!(wizard.view().notice.as_deref(), Some("quota exceeded"));

        wizard.back().unwrap();
        assert_eq!(wizard.view().notice, None);
        assert_eq!(wizard.last_error(), None);
    }

    #[test]
    fn editing_clears_the_submission_notice() {
        let mut wizard = wizard(1);
        wizard.edit("texto_anuncio", FieldEdit::Set("Hola".into())).unwrap();
        wizard.advance().unwrap();
        wizard
            .complete_submission(Err(BackendFailure::new("quota exceeded")))
            .unwrap();
        wizard.edit("comentarios", FieldEdit::Set("otra vez".into())).unwrap();
        assert_eq!(wizard.view().notice, None);
    }
}
