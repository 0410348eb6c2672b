use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use campaign_form::{
    Brand, FormDocument, Model, RequestSummary, Status, StatusChange, SubmissionEnvelope, User,
};

use crate::error::ClientError;
use crate::response::ApiResponse;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url.trim())?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// Endpoint for `action` with its query parameters appended.
    pub fn endpoint(&self, action: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// Calls a read action. Transport and decode failures come back as a
    /// `success:false` response.
    pub async fn call(&self, action: &str, params: &[(&str, &str)]) -> ApiResponse {
        let url = self.endpoint(action, params);
        self.fetch_normalized(action, url).await
    }

    /// Calls a write action with `data` serialized into the `data` parameter.
    pub async fn post<T: Serialize + ?Sized>(&self, action: &str, data: &T) -> ApiResponse {
        let encoded = match serde_json::to_string(data) {
            Ok(encoded) => encoded,
            Err(err) => return ApiResponse::failure(err.to_string()),
        };
        let url = self.endpoint(action, &[("data", &encoded)]);
        self.fetch_normalized(action, url).await
    }

    async fn fetch_normalized(&self, action: &str, url: Url) -> ApiResponse {
        match self.fetch(url).await {
            Ok(response) => {
                debug!(action, success = response.success, "api response");
                response
            }
            Err(err) => {
                warn!(action, error = %err, "api call failed");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    async fn fetch(&self, url: Url) -> Result<ApiResponse, ClientError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn login(&self, email: &str) -> Result<User, ClientError> {
        self.call("login", &[("email", email.trim())])
            .await
            .into_result()?
            .field("usuario")
    }

    pub async fn brands(&self, user_id: &str) -> Result<Vec<Brand>, ClientError> {
        self.call("getMarcas", &[("userId", user_id)])
            .await
            .into_result()?
            .field("marcas")
    }

    pub async fn form(&self, brand_name: &str) -> Result<FormDocument, ClientError> {
        self.call("getFormulario", &[("marca", brand_name)])
            .await
            .into_result()?
            .body_as()
    }

    pub async fn models(&self, brand_id: &str) -> Result<Vec<Model>, ClientError> {
        self.call("getModelos", &[("marcaId", brand_id)])
            .await
            .into_result()?
            .field("modelos")
    }

    /// Returns the number assigned to the new request.
    pub async fn create_request(&self, envelope: &SubmissionEnvelope) -> Result<String, ClientError> {
        let response = self.post("crearSolicitud", envelope).await.into_result()?;
        match response.field::<Value>("numeroSolicitud")? {
            Value::String(number) => Ok(number),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(ClientError::Decode(format!(
                "numeroSolicitud is not a request number: {other}"
            ))),
        }
    }

    pub async fn team_requests(&self) -> Result<Vec<RequestSummary>, ClientError> {
        self.call("getSolicitudesEquipo", &[])
            .await
            .into_result()?
            .field("solicitudes")
    }

    pub async fn statuses(&self) -> Result<Vec<Status>, ClientError> {
        self.call("getEstados", &[]).await.into_result()?.field("estados")
    }

    pub async fn update_status(&self, change: &StatusChange) -> Result<(), ClientError> {
        self.post("actualizarEstado", change).await.into_result()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_params_like_a_form() {
        let client = ApiClient::new("https://script.example.com/macros/s/abc/exec", DEFAULT_TIMEOUT)
            .expect("client");
        let url = client.endpoint("getFormulario", &[("marca", "Mercedes Benz & Co")]);
        assert_eq!(
            url.as_str(),
            "https://script.example.com/macros/s/abc/exec?action=getFormulario&marca=Mercedes+Benz+%26+Co"
        );
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(matches!(
            ApiClient::new("not a url", DEFAULT_TIMEOUT),
            Err(ClientError::Url(_))
        ));
    }
}
