//! Order, payment and registration models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Event summary embedded in order listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEventRef {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Buyer summary, present in the admin order overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub reference: String,
    #[serde(default)]
    pub event: Option<OrderEventRef>,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub total_amount: f64,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub order_status: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ticket_count: Option<u32>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "completed"
    }

    pub fn is_cancelled(&self) -> bool {
        self.order_status == "cancelled"
    }

    /// Unpaid, not cancelled, and the event has not started
    pub fn can_cancel(&self, now: DateTime<Utc>) -> bool {
        if self.is_paid() || self.is_cancelled() {
            return false;
        }
        match self.event.as_ref().and_then(|e| e.start_time) {
            Some(start) => start > now,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub ticket_type: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTicket {
    pub id: i64,
    pub code: String,
    pub status: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayment {
    pub provider: String,
    pub status: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body returned by `GET /api/orders/<id>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub tickets: Vec<OrderTicket>,
    #[serde(default)]
    pub payment: Option<OrderPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub ticket_type_id: i64,
    pub quantity: u32,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "cart_items")]
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn single(ticket_type_id: i64, quantity: u32) -> Self {
        Self {
            items: vec![OrderItemRequest { ticket_type_id, quantity }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: i64,
    pub reference: String,
    pub total_amount: f64,
    #[serde(default)]
    pub payment_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub order: CreatedOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_reference: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub provider_ref: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    pub status: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: i64,
    pub amount: f64,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_ref: Option<String>,
}

impl PaymentRequest {
    /// M-Pesa payment for the full order total
    pub fn mpesa(order_id: i64, amount: f64, provider_ref: Option<String>) -> Self {
        Self {
            order_id,
            amount,
            provider: "mpesa".to_string(),
            provider_ref,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrderRef {
    pub id: i64,
    pub reference: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: i64,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub order: PaymentOrderRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub quantity: u32,
    #[serde(default)]
    pub registration_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub registered_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/registrations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCreated {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Entry of `GET /api/users/<id>/wishlist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: i64,
    pub event: super::Event,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub added_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_order_wire_name() {
        let body = serde_json::to_value(CreateOrderRequest::single(4, 2)).unwrap();
        assert_eq!(body["cart_items"][0]["ticket_type_id"], 4);
        assert_eq!(body["cart_items"][0]["quantity"], 2);
    }

    #[test]
    fn test_order_cancellation_rules() {
        let json = r#"{
            "id": 1, "reference": "ORD-1A2B3C4D",
            "event": {"id": 7, "title": "Jazz", "start_time": "2030-05-01T19:00:00", "venue": "Grounds", "city": "Nairobi"},
            "total_amount": 3000.0, "payment_status": "pending", "order_status": "processing",
            "created_at": "2025-01-01T08:00:00", "ticket_count": 2
        }"#;
        let mut order: Order = serde_json::from_str(json).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(order.can_cancel(now));

        order.payment_status = "completed".to_string();
        assert!(order.is_paid());
        assert!(!order.can_cancel(now));

        order.payment_status = "pending".to_string();
        let after_start = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        assert!(!order.can_cancel(after_start));
    }

    #[test]
    fn test_order_details_with_full_event() {
        let json = r#"{
            "order": {
                "id": 1, "reference": "ORD-1", "total_amount": 1500.0,
                "payment_status": "completed", "order_status": "confirmed",
                "event": {"id": 7, "title": "Jazz", "start_time": "2030-05-01T19:00:00",
                          "status": "approved", "capacity": 300, "poster_url": null}
            },
            "order_items": [{"ticket_type": "Regular", "quantity": 1, "unit_price": 1500.0, "subtotal": 1500.0}],
            "tickets": [{"id": 9, "code": "TKT-ABC", "status": "valid", "checked_in_at": null}],
            "payment": null
        }"#;
        let details: OrderDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.order_items[0].subtotal, 1500.0);
        assert_eq!(details.tickets[0].code, "TKT-ABC");
        assert!(details.payment.is_none());
    }
}
