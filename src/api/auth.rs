//! `/api/auth` endpoints

use crate::models::{AuthResponse, CurrentUserResponse, LoginRequest, MessageResponse, RegisterRequest, RegisterResponse, User};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.client.post("/api/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.client.post("/api/auth/register", request).await
    }

    /// `GET /api/auth/me`
    pub async fn current_user(&self) -> ApiResult<User> {
        let response: CurrentUserResponse = self.client.get("/api/auth/me").await?;
        Ok(response.user)
    }

    pub async fn logout(&self) -> ApiResult<MessageResponse> {
        self.client.post_empty("/api/auth/logout").await
    }
}
