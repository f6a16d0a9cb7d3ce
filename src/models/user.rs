//! User model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::Event360Error;

/// Platform role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Attendee,
    Organizer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Attendee, Role::Organizer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Attendee => "attendee",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    /// Human label ("Organizer")
    pub fn label(&self) -> &'static str {
        match self {
            Role::Attendee => "Attendee",
            Role::Organizer => "Organizer",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Event360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attendee" => Ok(Role::Attendee),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(Event360Error::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Absent from user-management payloads, which only carry `role_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Effective role; a payload without a role name reads as attendee
    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    pub fn role_label(&self) -> &'static str {
        self.role.map_or("Unknown", |role| role.label())
    }
}

fn default_true() -> bool {
    true
}

/// Body returned by `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub user: User,
}

/// Body returned by `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: Option<User>,
}

/// Envelope returned by `GET /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Body returned by `PUT /api/users/<id>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_user_payload() {
        let json = r#"{"id": 1, "username": "admin", "email": "admin@event360.com", "role": "admin", "avatar_url": null}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Some(Role::Admin));
        assert!(user.is_active);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_role_id_only_payload() {
        let json = r#"{"id": 7, "username": "sam", "email": "sam@example.com", "phone": null, "role_id": 1, "is_active": true, "created_at": "2025-01-02T10:00:00"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, None);
        assert_eq!(user.role_id, Some(1));
        assert_eq!(user.role(), Role::Attendee);
        assert_eq!(user.role_label(), "Unknown");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Organizer".parse::<Role>().unwrap(), Role::Organizer);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Attendee);
    }

    #[test]
    fn test_notification_type_field() {
        let json = r#"{"id": 3, "title": "Event Approved", "message": "ok", "type": "event_approved", "is_read": false, "created_at": "2025-01-02T10:00:00"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind.as_deref(), Some("event_approved"));
        assert!(n.created_at.is_some());
    }
}
