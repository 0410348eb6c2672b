use campaign_form::{BackendFailure, SUBMIT_FALLBACK_MESSAGE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
    /// `success:false` from a well-formed response.
    #[error("{message}")]
    Api { message: String },
}

impl ClientError {
    pub(crate) fn api(message: Option<String>) -> Self {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| SUBMIT_FALLBACK_MESSAGE.to_string());
        ClientError::Api { message }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<ClientError> for BackendFailure {
    fn from(err: ClientError) -> Self {
        BackendFailure::new(err.to_string())
    }
}
