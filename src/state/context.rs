//! Conversation context management
//!
//! Tracks the multi-step form a chat is filling in: current scenario, step
//! and the answers collected so far.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use crate::utils::errors::{Event360Error, Result};

/// Chat conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Chat this context belongs to
    pub chat_id: i64,
    pub scenario: Option<String>,
    pub step: Option<String>,
    /// Answers collected so far
    pub data: HashMap<String, serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            scenario: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Start a new scenario, discarding any earlier answers
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str) -> Result<()> {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(1));
        Ok(())
    }

    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.scenario.is_none() {
            return Err(Event360Error::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: step.to_string(),
            });
        }

        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key).unwrap_or(None)
    }

    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.updated_at = Utc::now();
        self.data.remove(key)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |expires_at| Utc::now() > expires_at)
    }

    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.scenario.is_some()
    }

    pub fn is_in_scenario(&self, scenario: &str) -> bool {
        self.scenario.as_deref() == Some(scenario)
    }

    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_deref() == Some(step)
    }

    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.is_in_scenario(scenario) && self.is_at_step(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let context = ConversationContext::new(123);
        assert_eq!(context.chat_id, 123);
        assert!(!context.is_active());
        assert!(context.data.is_empty());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_start_scenario_resets_answers() {
        let mut context = ConversationContext::new(123);
        context.start_scenario("register", "username").unwrap();
        context.set_data("username", "jane").unwrap();

        context.start_scenario("login", "email").unwrap();
        assert!(context.is_at("login", "email"));
        assert!(context.get_string("username").is_none());
        assert!(context.expires_at.is_some());
    }

    #[test]
    fn test_next_step_requires_scenario() {
        let mut context = ConversationContext::new(1);
        assert!(matches!(
            context.next_step("password"),
            Err(Event360Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_data_operations() {
        let mut context = ConversationContext::new(123);
        context.set_data("title", "Jazz Night").unwrap();
        context.set_data("capacity", 300).unwrap();

        assert_eq!(context.get_string("title"), Some("Jazz Night".to_string()));
        assert_eq!(context.get_i64("capacity"), Some(300));

        context.remove_data("capacity");
        assert_eq!(context.get_i64("capacity"), None);
    }

    #[test]
    fn test_expiry() {
        let mut context = ConversationContext::new(123);
        context.set_expiry(Utc::now() - Duration::hours(1));
        assert!(context.is_expired());

        context.set_expiry(Utc::now() + Duration::hours(1));
        assert!(!context.is_expired());
    }
}
