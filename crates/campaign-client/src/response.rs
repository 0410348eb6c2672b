use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// The `{success, error, …}` envelope every action answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Action-specific fields.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl ApiResponse {
    /// Shape used for transport and decode failures.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            body: Map::new(),
        }
    }

    /// Turns a business failure into [`ClientError::Api`].
    pub fn into_result(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::api(self.error))
        }
    }

    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<T, ClientError> {
        let value = self
            .body
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::Decode(format!("missing '{key}'")))?;
        serde_json::from_value(value)
            .map_err(|err| ClientError::Decode(format!("field '{key}': {err}")))
    }

    /// The action-specific fields decoded as one value.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(Value::Object(self.body.clone()))?)
    }
}
