//! `/api/users` endpoints

use crate::models::{
    ChangePasswordRequest, Event, MessageResponse, Notification, Order, UpdateProfileRequest, User,
    UserMutationResponse, WishlistItem,
};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        self.client.get("/api/users").await
    }

    pub async fn get(&self, user_id: i64) -> ApiResult<User> {
        self.client.get(&format!("/api/users/{}", user_id)).await
    }

    pub async fn update_profile(&self, user_id: i64, request: &UpdateProfileRequest) -> ApiResult<UserMutationResponse> {
        self.client.put(&format!("/api/users/{}", user_id), request).await
    }

    pub async fn change_password(&self, user_id: i64, request: &ChangePasswordRequest) -> ApiResult<MessageResponse> {
        self.client.put(&format!("/api/users/{}/change-password", user_id), request).await
    }

    pub async fn wishlist(&self, user_id: i64) -> ApiResult<Vec<WishlistItem>> {
        self.client.get(&format!("/api/users/{}/wishlist", user_id)).await
    }

    pub async fn notifications(&self, user_id: i64) -> ApiResult<Vec<Notification>> {
        self.client.get(&format!("/api/users/{}/notifications", user_id)).await
    }

    pub async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> ApiResult<MessageResponse> {
        self.client
            .put_empty(&format!("/api/users/{}/notifications/{}/read", user_id, notification_id))
            .await
    }

    /// Events organized by the user
    pub async fn events(&self, user_id: i64) -> ApiResult<Vec<Event>> {
        self.client.get(&format!("/api/users/{}/events", user_id)).await
    }

    pub async fn orders(&self, user_id: i64) -> ApiResult<Vec<Order>> {
        self.client.get(&format!("/api/users/{}/orders", user_id)).await
    }
}
