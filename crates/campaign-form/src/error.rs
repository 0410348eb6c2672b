use thiserror::Error;

/// Errors raised by the wizard controller when an event cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("not accepted in the current state: {0}")]
    InvalidState(&'static str),
    #[error("a submission is already in flight")]
    Busy,
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("'{option}' is not an option of field '{field}'")]
    UnknownOption { field: String, option: String },
    #[error("field '{0}' is not a multi-choice field")]
    NotMultiChoice(String),
    #[error("invalid answer: {0}")]
    InvalidAnswers(String),
    #[error("request is already in status '{0}'")]
    UnchangedStatus(String),
}
