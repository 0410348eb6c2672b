use async_trait::async_trait;

use campaign_form::{
    BackendFailure, FormBackend, FormDocument, Model, RequestStore, SubmissionEnvelope,
};

use crate::client::ApiClient;

#[async_trait]
impl FormBackend for ApiClient {
    async fn form_document(&self, brand_name: &str) -> Result<FormDocument, BackendFailure> {
        Ok(self.form(brand_name).await?)
    }

    async fn models(&self, brand_id: &str) -> Result<Vec<Model>, BackendFailure> {
        Ok(ApiClient::models(self, brand_id).await?)
    }
}

#[async_trait]
impl RequestStore for ApiClient {
    async fn create_request(&self, envelope: &SubmissionEnvelope) -> Result<String, BackendFailure> {
        Ok(ApiClient::create_request(self, envelope).await?)
    }
}
