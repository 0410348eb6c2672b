#![allow(missing_docs)]

pub mod answers;
pub mod backend;
pub mod catalog;
pub mod condition;
pub mod dashboard;
pub mod error;
pub mod field;
pub mod loader;
pub mod render;
pub mod spec;
pub mod submission;
pub mod validate;
pub mod wizard;

pub use answers::{AnswerState, AnswerValue, ErrorState, REQUIRED_MESSAGE};
pub use backend::{BackendFailure, FormBackend, RequestStore};
pub use catalog::{Brand, Model, User};
pub use condition::{Clause, Condition, visible};
pub use dashboard::{
    Filters, RequestStats, RequestSummary, Status, StatusChange, brand_options, status_options,
};
pub use error::FormError;
pub use field::{BoundField, FieldEdit, FieldInput, Toggle, apply_edit, bind_field};
pub use loader::{LoadTicket, LoadedSchema, SchemaLoader};
pub use render::{
    EMPTY_STEP_MESSAGE, StepView, build_step_view, render_json, render_text, step_title,
};
pub use spec::{FieldKind, FormDocument, FormSchema, MODELS_SENTINEL, OptionsSource, Question};
pub use submission::{SubmissionEnvelope, SubmittedRequest, assemble};
pub use validate::{validate_step, visible_questions};
pub use wizard::{Phase, SUBMIT_FALLBACK_MESSAGE, Transition, Wizard};
