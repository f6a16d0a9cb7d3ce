//! `/api/tickets` endpoints

use crate::models::{CheckInResponse, Ticket, TicketEnvelope, TicketVerification};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct TicketsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TicketsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Ticket>> {
        self.client.get("/api/tickets").await
    }

    pub async fn get(&self, ticket_id: i64) -> ApiResult<Ticket> {
        let envelope: TicketEnvelope = self.client.get(&format!("/api/tickets/{}", ticket_id)).await?;
        Ok(envelope.ticket)
    }

    pub async fn check_in(&self, ticket_id: i64) -> ApiResult<CheckInResponse> {
        self.client.post_empty(&format!("/api/tickets/{}/check-in", ticket_id)).await
    }

    pub async fn verify(&self, code: &str) -> ApiResult<TicketVerification> {
        self.client
            .get(&format!("/api/tickets/verify/{}", urlencoding::encode(code.trim())))
            .await
    }
}
