//! Authenticated API calls on behalf of a chat
//!
//! Every protected call goes through [`SessionService::call`], which attaches
//! the chat's bearer token and drops the session when the backend answers 401.

use std::future::Future;
use tracing::warn;
use crate::api::ApiClient;
use crate::state::{Session, StateStorage};
use crate::utils::errors::{ApiError, ApiResult, Event360Error, Result};
use crate::utils::logging::log_auth_event;

#[derive(Clone, Debug)]
pub struct SessionService {
    api: ApiClient,
    storage: StateStorage,
}

impl SessionService {
    pub fn new(api: ApiClient, storage: StateStorage) -> Self {
        Self { api, storage }
    }

    /// Client carrying the chat's token if it has one
    pub async fn client(&self, chat_id: i64) -> Result<ApiClient> {
        Ok(match self.storage.load_session(chat_id).await? {
            Some(session) => self.api.with_token(session.token),
            None => self.api.clone(),
        })
    }

    /// Run `request` with the chat's session; a 401 clears the session
    pub async fn call<T, F, Fut>(&self, chat_id: i64, request: F) -> Result<T>
    where
        F: FnOnce(ApiClient, Session) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let session = self
            .storage
            .load_session(chat_id)
            .await?
            .ok_or(Event360Error::NotAuthenticated)?;
        let client = self.api.with_token(&session.token);

        match request(client, session).await {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized(message)) => {
                warn!(chat_id = chat_id, reason = %message, "Token rejected, clearing session");
                self.storage.delete_session(chat_id).await?;
                self.storage.delete_context(chat_id).await?;
                log_auth_event(chat_id, "session_expired", false, Some(&message));
                Err(ApiError::Unauthorized(message).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
