//! Authentication service implementation
//!
//! Login, registration, logout and the cached user of a chat. A successful
//! login stores `token + user` in the chat's session; nothing else writes it
//! except logout, a rejected token and profile updates.

use tracing::{debug, info, warn};
use crate::api::ApiClient;
use crate::models::{LoginRequest, RegisterRequest, Role, User};
use crate::state::{Session, StateStorage};
use crate::utils::errors::{ApiError, Event360Error, Result};
use crate::utils::logging::log_auth_event;

/// Authentication service for a chat's session
#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
    storage: StateStorage,
}

impl AuthService {
    pub fn new(api: ApiClient, storage: StateStorage) -> Self {
        Self { api, storage }
    }

    /// Log in and persist the returned token and user
    pub async fn login(&self, chat_id: i64, credentials: &LoginRequest) -> Result<Session> {
        debug!(chat_id = chat_id, "Attempting login");

        let response = match self.api.auth().login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                log_auth_event(chat_id, "login", false, Some(&e.to_string()));
                return Err(failure(e, "Login failed"));
            }
        };

        let session = Session::new(chat_id, response.token, response.user);
        self.storage.save_session(&session).await?;

        log_auth_event(chat_id, "login", true, Some(session.user.role().as_str()));
        info!(chat_id = chat_id, user_id = session.user.id, role = %session.user.role(), "User logged in");
        Ok(session)
    }

    /// Register, then log in with the same credentials
    pub async fn register(&self, chat_id: i64, form: &RegisterRequest) -> Result<Session> {
        debug!(chat_id = chat_id, username = %form.username, "Attempting registration");

        if let Err(e) = self.api.auth().register(form).await {
            log_auth_event(chat_id, "register", false, Some(&e.to_string()));
            return Err(failure(e, "Registration failed"));
        }
        log_auth_event(chat_id, "register", true, Some(form.role.as_str()));

        let credentials = LoginRequest {
            email: form.email.clone(),
            password: form.password.clone(),
        };
        self.login(chat_id, &credentials).await
    }

    /// Clear local state first; the API call is best effort
    pub async fn logout(&self, chat_id: i64) -> Result<()> {
        let session = self.storage.load_session(chat_id).await.unwrap_or_else(|e| {
            warn!(chat_id = chat_id, error = %e, "Could not read session during logout");
            None
        });
        self.storage.clear_chat(chat_id).await?;
        log_auth_event(chat_id, "logout", true, None);

        if let Some(session) = session {
            if let Err(e) = self.api.with_token(&session.token).auth().logout().await {
                warn!(chat_id = chat_id, error = %e, "Server logout failed");
            }
        }
        Ok(())
    }

    pub async fn current_session(&self, chat_id: i64) -> Result<Option<Session>> {
        self.storage.load_session(chat_id).await
    }

    pub async fn is_authenticated(&self, chat_id: i64) -> Result<bool> {
        Ok(self.current_session(chat_id).await?.is_some())
    }

    /// Reload the user from `/api/auth/me`; any failure logs the chat out
    pub async fn refresh_user(&self, chat_id: i64) -> Result<Option<User>> {
        let session = match self.current_session(chat_id).await? {
            Some(session) => session,
            None => return Ok(None),
        };

        match self.api.with_token(&session.token).auth().current_user().await {
            Ok(user) => {
                self.update_user(chat_id, user.clone()).await?;
                Ok(Some(user))
            }
            Err(e) => {
                warn!(chat_id = chat_id, error = %e, "Could not refresh user, logging out");
                self.logout(chat_id).await?;
                Err(e.into())
            }
        }
    }

    /// Replace the cached user, keeping the token
    pub async fn update_user(&self, chat_id: i64, mut user: User) -> Result<()> {
        let mut session = self
            .current_session(chat_id)
            .await?
            .ok_or(Event360Error::NotAuthenticated)?;
        user.role = user.role.or(session.user.role);
        session.user = user;
        self.storage.save_session(&session).await
    }

    pub async fn has_role(&self, chat_id: i64, role: Role) -> Result<bool> {
        Ok(self.current_session(chat_id).await?.map_or(false, |s| s.has_role(role)))
    }

    pub async fn has_any_role(&self, chat_id: i64, roles: &[Role]) -> Result<bool> {
        Ok(self.current_session(chat_id).await?.map_or(false, |s| s.has_any_role(roles)))
    }

    pub async fn is_admin(&self, chat_id: i64) -> Result<bool> {
        self.has_role(chat_id, Role::Admin).await
    }

    /// Organizers and admins
    pub async fn is_organizer(&self, chat_id: i64) -> Result<bool> {
        self.has_any_role(chat_id, &[Role::Organizer, Role::Admin]).await
    }

    pub async fn is_attendee(&self, chat_id: i64) -> Result<bool> {
        self.has_role(chat_id, Role::Attendee).await
    }
}

/// Backend error text when it has one, otherwise the fallback
fn failure(error: ApiError, fallback: &str) -> Event360Error {
    match error {
        ApiError::Unauthorized(message) | ApiError::Status { message, .. } if !message.trim().is_empty() => {
            Event360Error::AuthFailed(message)
        }
        e @ (ApiError::Timeout | ApiError::ServiceUnavailable) => Event360Error::Api(e),
        _ => Event360Error::AuthFailed(fallback.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_prefers_backend_text() {
        let err = failure(ApiError::Unauthorized("Invalid credentials".into()), "Login failed");
        assert_eq!(err.user_message(), "Invalid credentials");

        let err = failure(ApiError::Status { status: 403, message: "Account is deactivated".into() }, "Login failed");
        assert_eq!(err.user_message(), "Account is deactivated");
    }

    #[test]
    fn test_failure_falls_back() {
        let err = failure(ApiError::InvalidResponse("eof".into()), "Registration failed");
        assert_eq!(err.user_message(), "Registration failed");

        let err = failure(ApiError::Status { status: 500, message: " ".into() }, "Login failed");
        assert_eq!(err.user_message(), "Login failed");

        assert!(matches!(failure(ApiError::Timeout, "Login failed"), Event360Error::Api(ApiError::Timeout)));
    }
}
