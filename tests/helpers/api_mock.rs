//! Mock Event360 API server

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};
use Event360::{ApiClient, ServiceFactory, Settings, StateStorage};

pub struct ApiMockServer {
    pub server: MockServer,
}

impl ApiMockServer {
    pub async fn start() -> Self {
        super::init_test_logging();
        Self { server: MockServer::start().await }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(&self.uri()).expect("mock server URI is a valid base URL")
    }

    /// Services wired against this server with in-memory storage
    pub fn services(&self) -> (ServiceFactory, StateStorage) {
        let settings = Settings::default();
        let storage = StateStorage::in_memory(settings.storage.clone());
        let services = ServiceFactory::with_client(settings, self.client(), storage.clone());
        (services, storage)
    }

    pub async fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond only when the request carries `Authorization: Bearer <token>`
    pub async fn respond_authorized(&self, verb: &str, route: &str, token: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_login(&self, token: &str, user: Value) {
        self.respond("POST", "/api/auth/login", 200, json!({
            "message": "Login successful",
            "token": token,
            "user": user,
        }))
        .await;
    }

    pub async fn mock_login_rejected(&self, message: &str) {
        self.respond("POST", "/api/auth/login", 401, json!({ "error": message })).await;
    }

    pub async fn mock_logout(&self) {
        self.respond("POST", "/api/auth/logout", 200, json!({ "message": "Logged out" })).await;
    }

    /// Number of requests received for a path
    pub async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == route)
            .count()
    }
}
