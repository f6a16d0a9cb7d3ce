//! `/api/registrations` endpoints

use crate::models::{CreateRegistrationRequest, MessageResponse, Registration, RegistrationCreated};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct RegistrationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RegistrationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Registration>> {
        self.client.get("/api/registrations").await
    }

    pub async fn create(&self, request: &CreateRegistrationRequest) -> ApiResult<RegistrationCreated> {
        self.client.post("/api/registrations", request).await
    }

    pub async fn cancel(&self, registration_id: i64) -> ApiResult<MessageResponse> {
        self.client.delete(&format!("/api/registrations/{}", registration_id)).await
    }

    pub async fn get(&self, registration_id: i64) -> ApiResult<Registration> {
        self.client.get(&format!("/api/registrations/{}", registration_id)).await
    }
}
