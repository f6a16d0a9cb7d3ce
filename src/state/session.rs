//! Per-chat authenticated session
//!
//! A session is the bot-side equivalent of the storefront's local storage:
//! the bearer token and the cached user, nothing else.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;
use crate::models::{Role, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub chat_id: i64,
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    /// Taken from the token's `exp` claim when present
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    pub fn new(chat_id: i64, token: impl Into<String>, user: User) -> Self {
        let token = token.into();
        let expires_at = token_expiry(&token);
        Self {
            chat_id,
            token,
            user,
            created_at: Utc::now(),
            expires_at,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Utc::now() >= exp)
    }

    /// Seconds until expiry, capped at `max`
    pub fn ttl_seconds(&self, max: u64) -> u64 {
        match self.expires_at {
            Some(exp) => {
                let remaining = u64::try_from((exp - Utc::now()).num_seconds()).unwrap_or(0);
                remaining.clamp(1, max.max(1))
            }
            None => max,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.role() == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.user.role())
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Organizers and admins may both organize events
    pub fn is_organizer(&self) -> bool {
        self.has_any_role(&[Role::Organizer, Role::Admin])
    }

    pub fn is_attendee(&self) -> bool {
        self.has_role(Role::Attendee)
    }
}

/// Read the `exp` claim of a JWT without verifying its signature
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims = HashSet::new();

    match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
        Err(e) => {
            debug!(error = %e, "Token carries no readable expiry");
            None
        }
    }
}
