//! Services module
//!
//! Session-aware business logic on top of the REST client.

pub mod auth;
pub mod session;

pub use auth::AuthService;
pub use session::SessionService;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::state::StateStorage;
use crate::utils::errors::Result;

/// Service factory shared by all handlers
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub api: ApiClient,
    pub storage: StateStorage,
    pub auth_service: AuthService,
    pub session_service: SessionService,
    pub settings: Settings,
}

impl ServiceFactory {
    pub fn new(settings: Settings, storage: StateStorage) -> Result<Self> {
        let api = ApiClient::new(&settings.api)?;
        Ok(Self::with_client(settings, api, storage))
    }

    pub fn with_client(settings: Settings, api: ApiClient, storage: StateStorage) -> Self {
        Self {
            auth_service: AuthService::new(api.clone(), storage.clone()),
            session_service: SessionService::new(api.clone(), storage.clone()),
            api,
            storage,
            settings,
        }
    }

    /// Health check of the state backend
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let storage_healthy = self.storage.test_connection().await.is_ok();
        ServiceHealthStatus {
            storage_backend: self.storage.backend_name(),
            storage_healthy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub storage_backend: &'static str,
    pub storage_healthy: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.storage_healthy
    }

    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.storage_healthy {
            issues.push(format!("{} state storage is unreachable", self.storage_backend));
        }
        issues
    }
}
