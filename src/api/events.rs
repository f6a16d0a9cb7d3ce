//! `/api/events` endpoints

use serde::Serialize;
use crate::models::{
    ApproveEventRequest, CreateEventRequest, Event, EventDetails, EventMutationResponse, MessageResponse,
    PendingEvent, Registration, ReviewRequest, UpdateEventRequest,
};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct EventsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EventsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List events; `params` is sent as the query string
    pub async fn list<Q: Serialize + ?Sized>(&self, params: &Q) -> ApiResult<Vec<Event>> {
        self.client.get_with_query("/api/events", params).await
    }

    pub async fn get(&self, event_id: i64) -> ApiResult<EventDetails> {
        self.client.get(&format!("/api/events/{}", event_id)).await
    }

    pub async fn create(&self, request: &CreateEventRequest) -> ApiResult<EventMutationResponse> {
        self.client.post("/api/events", request).await
    }

    pub async fn update(&self, event_id: i64, request: &UpdateEventRequest) -> ApiResult<EventMutationResponse> {
        self.client.put(&format!("/api/events/{}", event_id), request).await
    }

    pub async fn delete(&self, event_id: i64) -> ApiResult<MessageResponse> {
        self.client.delete(&format!("/api/events/{}", event_id)).await
    }

    pub async fn add_to_wishlist(&self, event_id: i64) -> ApiResult<MessageResponse> {
        self.client.post_empty(&format!("/api/events/{}/wishlist", event_id)).await
    }

    pub async fn remove_from_wishlist(&self, event_id: i64) -> ApiResult<MessageResponse> {
        self.client.delete(&format!("/api/events/{}/wishlist", event_id)).await
    }

    pub async fn create_review(&self, event_id: i64, request: &ReviewRequest) -> ApiResult<MessageResponse> {
        self.client.post(&format!("/api/events/{}/reviews", event_id), request).await
    }

    /// Registrations for an event (organizer or admin)
    pub async fn registrations(&self, event_id: i64) -> ApiResult<Vec<Registration>> {
        self.client.get(&format!("/api/events/{}/registrations", event_id)).await
    }

    pub async fn approve(&self, event_id: i64, request: &ApproveEventRequest) -> ApiResult<EventMutationResponse> {
        self.client.post(&format!("/api/events/{}/approve", event_id), request).await
    }

    pub async fn pending(&self) -> ApiResult<Vec<PendingEvent>> {
        self.client.get("/api/events/pending").await
    }
}
