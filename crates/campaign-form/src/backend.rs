//! Seams to the external action API.
//!
//! The HTTP client in `campaign-client` implements these traits; tests use
//! in-memory doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Model;
use crate::spec::form::FormDocument;
use crate::submission::SubmissionEnvelope;

/// A failed call, already reduced to the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendFailure {
    pub message: String,
}

impl BackendFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Source of form definitions and model catalogs.
#[async_trait]
pub trait FormBackend: Send + Sync {
    async fn form_document(&self, brand_name: &str) -> Result<FormDocument, BackendFailure>;

    async fn models(&self, brand_id: &str) -> Result<Vec<Model>, BackendFailure>;
}

/// Persists submitted requests.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Returns the request number assigned by the server.
    async fn create_request(&self, envelope: &SubmissionEnvelope) -> Result<String, BackendFailure>;
}
