//! `/api/payments` endpoints

use crate::models::{Payment, PaymentRequest, PaymentResponse};
use crate::utils::errors::ApiResult;
use super::ApiClient;

pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn process(&self, request: &PaymentRequest) -> ApiResult<PaymentResponse> {
        self.client.post("/api/payments", request).await
    }

    pub async fn get(&self, payment_id: i64) -> ApiResult<Payment> {
        self.client.get(&format!("/api/payments/{}", payment_id)).await
    }

    pub async fn for_order(&self, order_id: i64) -> ApiResult<Vec<Payment>> {
        self.client.get(&format!("/api/payments/order/{}", order_id)).await
    }
}
