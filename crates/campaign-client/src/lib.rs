//! Client for the spreadsheet-backed action API.
//!
//! Every call is a `GET <base>?action=<name>&…`; writes carry their payload as
//! one JSON-encoded `data` parameter. Responses share the `{success, error}`
//! envelope modelled by [`ApiResponse`].

mod backend;
mod client;
mod error;
mod response;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use response::ApiResponse;
