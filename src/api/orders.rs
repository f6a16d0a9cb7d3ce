//! `/api/orders` endpoints

use crate::models::{CreateOrderRequest, CreateOrderResponse, MessageResponse, Order, OrderDetails};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Orders of the current user, newest first
    pub async fn list(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/api/orders").await
    }

    pub async fn get(&self, order_id: i64) -> ApiResult<OrderDetails> {
        self.client.get(&format!("/api/orders/{}", order_id)).await
    }

    pub async fn create(&self, request: &CreateOrderRequest) -> ApiResult<CreateOrderResponse> {
        self.client.post("/api/orders", request).await
    }

    pub async fn cancel(&self, order_id: i64) -> ApiResult<MessageResponse> {
        self.client.post_empty(&format!("/api/orders/{}/cancel", order_id)).await
    }
}
