//! Ticket model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Valid,
    Used,
    Cancelled,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::Valid => "valid",
            TicketStatus::Used => "used",
            TicketStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketEventRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeRef {
    pub name: String,
    #[serde(default)]
    pub access_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketHolder {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub order_reference: Option<String>,
    #[serde(default)]
    pub event: Option<TicketEventRef>,
    #[serde(default)]
    pub ticket_type: Option<TicketTypeRef>,
    #[serde(default)]
    pub user: Option<TicketHolder>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub qr_code_url: Option<String>,
}

impl Ticket {
    pub fn is_checked_in(&self) -> bool {
        self.checked_in_at.is_some()
    }
}

/// Envelope of `GET /api/tickets/<id>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketEnvelope {
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckedInTicket {
    pub code: String,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Body of `POST /api/tickets/<id>/check-in`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub ticket: CheckedInTicket,
}

/// Body of `GET /api/tickets/verify/<code>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketVerification {
    pub valid: bool,
    pub status: TicketStatus,
    pub event: TicketEventRef,
    pub user: TicketHolder,
    pub ticket_type: String,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_listing_entry() {
        let json = r#"{
            "id": 9, "code": "TKT-0A1B2C3D4E5F", "order_reference": "ORD-1",
            "event": {"id": 7, "title": "Jazz", "start_time": "2030-05-01T19:00:00", "venue": "Grounds", "city": "Nairobi"},
            "ticket_type": {"name": "VIP", "access_level": "vip"},
            "status": "used", "checked_in_at": "2030-05-01T18:30:00",
            "created_at": "2025-01-01T08:00:00", "qr_code_url": null
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.status, TicketStatus::Used);
        assert!(ticket.is_checked_in());
        assert_eq!(ticket.ticket_type.unwrap().access_level.as_deref(), Some("vip"));
    }

    #[test]
    fn test_verification_payload() {
        let json = r#"{
            "valid": true, "status": "valid",
            "event": {"title": "Jazz", "start_time": "2030-05-01T19:00:00", "venue": "Grounds"},
            "user": {"name": "jane", "email": "jane@example.com"},
            "ticket_type": "Regular", "checked_in": false, "checked_in_at": null
        }"#;
        let v: TicketVerification = serde_json::from_str(json).unwrap();
        assert!(v.valid);
        assert!(v.event.id.is_none());
        assert_eq!(v.user.name, "jane");
    }
}
