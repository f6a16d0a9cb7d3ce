//! HTTP client for the Event360 REST API
//!
//! Every request carries a JSON content type and, once a session exists, the
//! bearer token. Non-success responses are mapped onto [`ApiError`] using the
//! backend's `error` or `message` field.

use std::time::{Duration, Instant};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use crate::config::ApiConfig;
use crate::utils::errors::{ApiError, ApiResult, Event360Error, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::{log_api_call, log_api_error};
use super::{AdminApi, AuthApi, EventsApi, OrdersApi, PaymentsApi, RegistrationsApi, TicketsApi, UploadsApi, UsersApi};

/// Event360 API client
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new ApiClient from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Event360Error::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Client with default settings against the given base URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..crate::config::Settings::default().api
        };
        Self::new(&config)
    }

    /// Copy of this client that authenticates as the given token
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    pub fn registrations(&self) -> RegistrationsApi<'_> {
        RegistrationsApi::new(self)
    }

    pub fn tickets(&self) -> TicketsApi<'_> {
        TicketsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn uploads(&self) -> UploadsApi<'_> {
        UploadsApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.send(Method::GET, path, builder).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::POST, path, self.request(Method::POST, path)).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        // multipart sets its own boundary content type
        let mut builder = self.http.post(self.url(path)).multipart(form);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        self.send(Method::POST, path, builder).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, builder).await
    }

    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::PUT, path, self.request(Method::PUT, path)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, builder: RequestBuilder) -> ApiResult<T> {
        let started = Instant::now();
        debug!(method = %method, path = %path, authenticated = self.token.is_some(), "Sending API request");

        let response = builder.send().await.map_err(|e| {
            let error = transport_error(&e);
            log_api_error("event360", &error.to_string(), Some(path));
            error
        })?;

        log_api_call(method.as_str(), path, response.status().as_u16(), started.elapsed().as_millis() as u64);
        handle_response(response).await
    }
}

fn transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else if error.is_connect() {
        ApiError::ServiceUnavailable
    } else {
        ApiError::RequestFailed(error.to_string())
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()));
    }

    let message = error_message(status, &body);
    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Status { status: status.as_u16(), message })
    }
}

/// Backend error text: `error`, then `message`, then the raw body
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('<') {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        truncate_text(raw, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        let body = br#"{"error": "Invalid credentials", "message": "ignored"}"#;
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "Invalid credentials");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(StatusCode::BAD_REQUEST, br#"{"message": "Cart is empty"}"#), "Cart is empty");
        assert_eq!(error_message(StatusCode::NOT_FOUND, b""), "Not Found");
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, b"<html>boom</html>"), "Internal Server Error");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b"upstream down"), "upstream down");
    }

    #[test]
    fn test_with_token_keeps_base_url() {
        let client = ApiClient::with_base_url("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert!(client.token().is_none());

        let authed = client.with_token("abc");
        assert_eq!(authed.token(), Some("abc"));
        assert_eq!(authed.url("/api/events"), "http://localhost:5000/api/events");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ApiClient::with_base_url("not a url").is_err());
    }
}
