pub(crate) mod cell;
pub mod form;
pub mod question;

pub use form::{FormDocument, FormSchema};
pub use question::{FieldKind, MODELS_SENTINEL, OptionsSource, Question};
