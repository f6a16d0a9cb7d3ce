//! Admin models

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use super::{Event, Role};
use super::order::UserRef;

/// Body of `GET /api/admin/statistics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub users: UserStatistics,
    #[serde(default)]
    pub events: EventStatistics,
    #[serde(default)]
    pub orders: OrderStatistics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub by_role: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
        }
    }

    /// Past tense used in confirmations ("approved")
    pub fn past_tense(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approved",
            ApprovalAction::Reject => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveEventRequest {
    pub action: ApprovalAction,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: bool,
}

/// Body of `POST /api/admin/create-first-admin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Entry of `GET /api/admin/events/pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEvent {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub organizer: Option<UserRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_payload() {
        let json = r#"{
            "users": {"total": 10, "active": 9, "by_role": {"admin": 1, "organizer": 3, "attendee": 6}},
            "events": {"total": 5, "approved": 3, "pending": 1, "rejected": 1, "cancelled": 0},
            "orders": {"total": 4, "completed": 2, "revenue": 7500.5}
        }"#;
        let stats: Statistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.users.by_role.get("organizer"), Some(&3));
        assert_eq!(stats.events.pending, 1);
        assert_eq!(stats.orders.revenue, 7500.5);
    }

    #[test]
    fn test_approval_body() {
        let body = ApproveEventRequest { action: ApprovalAction::Reject, comment: "Missing venue details".into() };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["action"], "reject");
        assert_eq!(value["comment"], "Missing venue details");
    }

    #[test]
    fn test_pending_event_carries_organizer() {
        let json = r#"{
            "id": 3, "title": "Tech Summit", "start_time": "2030-02-01T09:00:00", "status": "pending",
            "organizer": {"id": 2, "username": "organizer", "email": "org@event360.com"}
        }"#;
        let pending: PendingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(pending.event.title, "Tech Summit");
        assert_eq!(pending.organizer.unwrap().username, "organizer");
    }
}
