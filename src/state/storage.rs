//! State storage implementation
//!
//! Sessions, conversation contexts and listing state are persisted as JSON
//! blobs with a TTL, either in process memory or in Redis.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use crate::config::{StorageBackend, StorageConfig, MAX_TTL_SECONDS};
use crate::listing::ListingState;
use crate::utils::errors::Result;
use super::context::ConversationContext;
use super::session::Session;

const SESSION: &str = "session";
const CONTEXT: &str = "context";
const LISTING: &str = "listing";

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<String, MemoryEntry>>>),
    Redis(redis::aio::ConnectionManager),
}

/// Key/value state storage with TTL
#[derive(Clone)]
pub struct StateStorage {
    backend: Backend,
    config: StorageConfig,
}

impl StateStorage {
    /// Create a storage instance for the configured backend
    pub async fn new(config: StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Redis => {
                let client = redis::Client::open(config.redis_url.as_str())?;
                let connection_manager = redis::aio::ConnectionManager::new(client).await?;
                info!(prefix = %config.prefix, "Using Redis state storage");
                Ok(Self {
                    backend: Backend::Redis(connection_manager),
                    config,
                })
            }
        }
    }

    /// Process-local storage; state is lost on restart
    pub fn in_memory(config: StorageConfig) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
            config,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    pub async fn save_session(&self, session: &Session) -> Result<()> {
        let ttl = session.ttl_seconds(self.config.ttl_seconds);
        debug!(chat_id = session.chat_id, user_id = session.user.id, ttl_seconds = ttl, "Saving session");
        self.set_json(&self.key(SESSION, session.chat_id), session, ttl).await
    }

    /// Load the chat's session; expired sessions are removed and read as absent
    pub async fn load_session(&self, chat_id: i64) -> Result<Option<Session>> {
        let session: Option<Session> = self.get_json(&self.key(SESSION, chat_id)).await?;
        match session {
            Some(session) if session.is_expired() => {
                warn!(chat_id = chat_id, expires_at = ?session.expires_at, "Session has expired, removing");
                self.delete_session(chat_id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn delete_session(&self, chat_id: i64) -> Result<()> {
        self.delete(&self.key(SESSION, chat_id)).await
    }

    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let ttl_seconds = match context.expires_at {
            Some(expires_at) => std::cmp::max((expires_at - chrono::Utc::now()).num_seconds(), 60) as u64,
            None => self.config.ttl_seconds,
        };
        debug!(chat_id = context.chat_id, scenario = ?context.scenario, step = ?context.step, "Saving context");
        self.set_json(&self.key(CONTEXT, context.chat_id), context, ttl_seconds).await
    }

    pub async fn load_context(&self, chat_id: i64) -> Result<Option<ConversationContext>> {
        let context: Option<ConversationContext> = self.get_json(&self.key(CONTEXT, chat_id)).await?;
        match context {
            Some(context) if context.is_expired() => {
                warn!(chat_id = chat_id, expires_at = ?context.expires_at, "Context has expired, removing");
                self.delete_context(chat_id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn delete_context(&self, chat_id: i64) -> Result<()> {
        self.delete(&self.key(CONTEXT, chat_id)).await
    }

    pub async fn save_listing(&self, chat_id: i64, listing: &ListingState) -> Result<()> {
        self.set_json(&self.key(LISTING, chat_id), listing, self.config.ttl_seconds).await
    }

    pub async fn load_listing(&self, chat_id: i64) -> Result<Option<ListingState>> {
        self.get_json(&self.key(LISTING, chat_id)).await
    }

    /// Remove everything stored for a chat
    pub async fn clear_chat(&self, chat_id: i64) -> Result<()> {
        for kind in [SESSION, CONTEXT, LISTING] {
            self.delete(&self.key(kind, chat_id)).await?;
        }
        debug!(chat_id = chat_id, "Cleared chat state");
        Ok(())
    }

    /// Chats with a stored session
    pub async fn active_sessions(&self) -> Result<Vec<i64>> {
        let prefix = format!("{}{}:", self.config.prefix, SESSION);
        let keys: Vec<String> = match &self.backend {
            Backend::Memory(map) => {
                let now = Instant::now();
                map.read()
                    .await
                    .iter()
                    .filter(|(key, entry)| key.starts_with(&prefix) && entry.expires_at > now)
                    .map(|(key, _)| key.clone())
                    .collect()
            }
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                conn.keys(format!("{}*", prefix)).await?
            }
        };

        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|id| id.parse::<i64>().ok())
            .collect())
    }

    /// Drop expired in-memory entries; Redis expires keys on its own
    pub async fn cleanup_expired(&self) -> usize {
        match &self.backend {
            Backend::Memory(map) => {
                let now = Instant::now();
                let mut map = map.write().await;
                let before = map.len();
                map.retain(|_, entry| entry.expires_at > now);
                before - map.len()
            }
            Backend::Redis(_) => 0,
        }
    }

    /// Run [`Self::cleanup_expired`] on an interval
    pub fn spawn_cleanup(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let storage = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = storage.cleanup_expired().await;
                if removed > 0 {
                    info!("Cleanup task removed {} expired entries", removed);
                }
            }
        })
    }

    /// Test the backend connection
    pub async fn test_connection(&self) -> Result<()> {
        if let Backend::Redis(manager) = &self.backend {
            let mut conn = manager.clone();
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        }
        Ok(())
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> Result<()> {
        let ttl_seconds = ttl_seconds.min(MAX_TTL_SECONDS);
        let serialized = serde_json::to_string(value).map_err(|e| {
            error!(key = %key, error = %e, "Failed to serialize state");
            e
        })?;

        match &self.backend {
            Backend::Memory(map) => {
                let now = Instant::now();
                let entry = MemoryEntry {
                    value: serialized,
                    expires_at: now.checked_add(Duration::from_secs(ttl_seconds)).unwrap_or(now),
                };
                map.write().await.insert(key.to_string(), entry);
            }
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                conn.set_ex::<_, _, ()>(key, serialized, ttl_seconds).await.map_err(|e| {
                    error!(key = %key, error = %e, "Failed to save state to Redis");
                    e
                })?;
            }
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = match &self.backend {
            Backend::Memory(map) => map
                .read()
                .await
                .get(key)
                .filter(|entry| entry.expires_at > Instant::now())
                .map(|entry| entry.value.clone()),
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                conn.get(key).await?
            }
        };

        match raw {
            Some(data) => match serde_json::from_str(&data) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // stale shape from an older build
                    warn!(key = %key, error = %e, "Discarding undecodable state");
                    self.delete(key).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.remove(key);
            }
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                let _: u32 = conn.del(key).await?;
            }
        }
        Ok(())
    }

    fn key(&self, kind: &str, chat_id: i64) -> String {
        format!("{}{}:{}", self.config.prefix, kind, chat_id)
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("backend", &self.backend_name())
            .field("prefix", &self.config.prefix)
            .finish_non_exhaustive()
    }
}
