use crate::answers::{AnswerState, ErrorState};
use crate::condition::visible;
use crate::field::required_error;
use crate::spec::form::FormSchema;
use crate::spec::question::Question;

/// Questions of `step` whose condition holds for `answers`, in schema order.
pub fn visible_questions<'a>(
    schema: &'a FormSchema,
    step: u32,
    answers: &AnswerState,
) -> Vec<&'a Question> {
    schema
        .step_questions(step)
        .iter()
        .filter(|question| visible(question.condition.as_deref(), answers))
        .collect()
}

/// Checks every visible required question of `step`; hidden questions are
/// skipped whatever their value.
pub fn validate_step(schema: &FormSchema, step: u32, answers: &AnswerState) -> ErrorState {
    let mut errors = ErrorState::new();
    for question in visible_questions(schema, step, answers) {
        if let Some(message) = required_error(question, answers) {
            errors.insert(&question.field, message);
        }
    }
    errors
}
