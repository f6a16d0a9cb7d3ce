//! `/api/admin` endpoints

use crate::models::{
    ApproveEventRequest, EventMutationResponse, FirstAdminRequest, MessageResponse, Order, PendingEvent,
    Statistics, UpdateRoleRequest, UpdateStatusRequest, UserMutationResponse,
};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn pending_events(&self) -> ApiResult<Vec<PendingEvent>> {
        self.client.get("/api/admin/events/pending").await
    }

    pub async fn approve_event(&self, event_id: i64, request: &ApproveEventRequest) -> ApiResult<EventMutationResponse> {
        self.client.post(&format!("/api/admin/events/{}/approve", event_id), request).await
    }

    pub async fn update_user_role(&self, user_id: i64, request: &UpdateRoleRequest) -> ApiResult<UserMutationResponse> {
        self.client.put(&format!("/api/admin/users/{}/role", user_id), request).await
    }

    pub async fn toggle_user_status(&self, user_id: i64, request: &UpdateStatusRequest) -> ApiResult<UserMutationResponse> {
        self.client.put(&format!("/api/admin/users/{}/status", user_id), request).await
    }

    /// Every order on the platform, newest first
    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/api/admin/orders").await
    }

    pub async fn statistics(&self) -> ApiResult<Statistics> {
        self.client.get("/api/admin/statistics").await
    }

    pub async fn create_first_admin(&self, request: &FirstAdminRequest) -> ApiResult<MessageResponse> {
        self.client.post("/api/admin/create-first-admin", request).await
    }

    pub async fn seed_database(&self) -> ApiResult<MessageResponse> {
        self.client.post_empty("/api/admin/seed-database").await
    }
}
