//! State management module
//!
//! This module handles per-chat sessions, conversation state and the
//! storage behind them

pub mod context;
pub mod scenarios;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use context::ConversationContext;
pub use scenarios::{Scenario, ScenarioManager, ScenarioStep, StepValidation, InputType};
pub use session::{Session, token_expiry};
pub use storage::StateStorage;
