//! Conversation scenarios implementation
//!
//! Each scenario is a linear multi-step form: login, registration, event
//! creation, event search and reviews. Steps carry the prompt shown to the
//! user and the per-answer validation rules.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::listing::{CATEGORIES, CITIES};
use crate::utils::errors::{Event360Error, Result};
use super::context::ConversationContext;

pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";
pub const CREATE_EVENT: &str = "create_event";
pub const SEARCH: &str = "search";
pub const REVIEW: &str = "review";
pub const CHANGE_PASSWORD: &str = "change_password";

/// Represents a conversation scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub initial_step: String,
    pub steps: HashMap<String, ScenarioStep>,
    /// Maximum duration for this scenario (in seconds)
    pub max_duration: Option<u64>,
    /// Whether another command may abandon this scenario
    pub interruptible: bool,
}

/// Represents a step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub id: String,
    /// Question shown to the user
    pub prompt: String,
    /// Possible next steps; empty for the last step
    pub next_steps: Vec<String>,
    pub validation: Option<StepValidation>,
    /// Whether "skip" is accepted as an answer
    pub skippable: bool,
    /// Answer must not be echoed back or logged
    pub sensitive: bool,
}

/// Validation rules for a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    pub input_type: InputType,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Pattern to match (regex)
    pub pattern: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    Number,
    Date,
    Time,
    Email,
    Choice(Vec<String>),
}

/// Scenario manager for handling all conversation scenarios
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenarios: HashMap<String, Scenario>,
}

impl ScenarioManager {
    /// Create a new scenario manager with default scenarios
    pub fn new() -> Self {
        let mut manager = Self {
            scenarios: HashMap::new(),
        };

        manager.register_default_scenarios();
        manager
    }

    fn register_default_scenarios(&mut self) {
        self.register_scenario(create_login_scenario());
        self.register_scenario(create_register_scenario());
        self.register_scenario(create_event_creation_scenario());
        self.register_scenario(create_search_scenario());
        self.register_scenario(create_review_scenario());
        self.register_scenario(create_change_password_scenario());
    }

    pub fn register_scenario(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Start a scenario for a chat
    pub fn start_scenario(&self, context: &mut ConversationContext, scenario_id: &str) -> Result<()> {
        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| Event360Error::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        context.start_scenario(scenario_id, &scenario.initial_step)?;

        if let Some(max_duration) = scenario.max_duration {
            let expiry = chrono::Utc::now() + chrono::Duration::seconds(max_duration as i64);
            context.set_expiry(expiry);
        }

        Ok(())
    }

    /// Move to the given next step, rejecting transitions the scenario does not allow
    pub fn next_step(&self, context: &mut ConversationContext, next_step: &str) -> Result<()> {
        let (scenario, current_step) = self.current(context).map_err(|_| Event360Error::InvalidStateTransition {
            from: context.step.clone().unwrap_or_else(|| "no_step".to_string()),
            to: next_step.to_string(),
        })?;

        if !current_step.next_steps.iter().any(|s| s == next_step) || !scenario.steps.contains_key(next_step) {
            return Err(Event360Error::InvalidStateTransition {
                from: current_step.id.clone(),
                to: next_step.to_string(),
            });
        }

        context.next_step(next_step)
    }

    /// Advance along the linear path; `Ok(None)` means the scenario is complete
    pub fn advance(&self, context: &mut ConversationContext) -> Result<Option<ScenarioStep>> {
        let next = match self.get_current_step(context)?.next_steps.first() {
            Some(next) => next.clone(),
            None => return Ok(None),
        };
        self.next_step(context, &next)?;
        Ok(Some(self.get_current_step(context)?.clone()))
    }

    /// Validate user input for the current step
    pub fn validate_input(&self, context: &ConversationContext, input: &str) -> Result<()> {
        let step = self.get_current_step(context)?;
        if let Some(validation) = &step.validation {
            validate_input_against_rules(input.trim(), validation)?;
        }
        Ok(())
    }

    pub fn can_interrupt(&self, scenario_id: &str) -> bool {
        self.get_scenario(scenario_id)
            .map(|s| s.interruptible)
            .unwrap_or(true)
    }

    pub fn get_current_step(&self, context: &ConversationContext) -> Result<&ScenarioStep> {
        self.current(context).map(|(_, step)| step)
    }

    fn current(&self, context: &ConversationContext) -> Result<(&Scenario, &ScenarioStep)> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| Event360Error::InvalidInput("No active scenario".to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| Event360Error::InvalidInput("No active step".to_string()))?;

        let scenario = self.get_scenario(scenario_id)
            .ok_or_else(|| Event360Error::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let step = scenario.steps.get(step_id)
            .ok_or_else(|| Event360Error::InvalidInput(format!("Unknown step: {}", step_id)))?;

        Ok((scenario, step))
    }
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_input_against_rules(input: &str, validation: &StepValidation) -> Result<()> {
    let invalid = |fallback: String| {
        Event360Error::InvalidInput(validation.error_message.clone().unwrap_or(fallback))
    };
    let length = input.chars().count();

    if let Some(min_length) = validation.min_length {
        if length < min_length {
            return Err(invalid(format!("Input too short (minimum {} characters)", min_length)));
        }
    }

    if let Some(max_length) = validation.max_length {
        if length > max_length {
            return Err(invalid(format!("Input too long (maximum {} characters)", max_length)));
        }
    }

    if let Some(pattern) = &validation.pattern {
        let regex = regex::Regex::new(pattern)
            .map_err(|_| Event360Error::Config("Invalid regex pattern".to_string()))?;

        if !regex.is_match(input) {
            return Err(invalid("Input format is invalid".to_string()));
        }
    }

    match &validation.input_type {
        InputType::Email => {
            if !crate::utils::helpers::is_valid_email(input) {
                return Err(invalid("Invalid email format".to_string()));
            }
        }
        InputType::Number => {
            if input.parse::<f64>().is_err() {
                return Err(invalid("Invalid number format".to_string()));
            }
        }
        InputType::Date => {
            if chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d").is_err() {
                return Err(invalid("Invalid date format (YYYY-MM-DD)".to_string()));
            }
        }
        InputType::Time => {
            if chrono::NaiveTime::parse_from_str(input, "%H:%M").is_err() {
                return Err(invalid("Invalid time format (HH:MM)".to_string()));
            }
        }
        InputType::Choice(choices) => {
            if !choices.iter().any(|c| c.eq_ignore_ascii_case(input)) {
                return Err(invalid(format!("Invalid choice. Available options: {}", choices.join(", "))));
            }
        }
        InputType::Text => {}
    }

    Ok(())
}

fn step(id: &str, prompt: &str, next: Option<&str>) -> ScenarioStep {
    ScenarioStep {
        id: id.to_string(),
        prompt: prompt.to_string(),
        next_steps: next.map(|n| vec![n.to_string()]).unwrap_or_default(),
        validation: None,
        skippable: false,
        sensitive: false,
    }
}

fn rule(input_type: InputType, error_message: &str) -> Option<StepValidation> {
    Some(StepValidation {
        input_type,
        min_length: None,
        max_length: None,
        pattern: None,
        error_message: Some(error_message.to_string()),
    })
}

fn scenario(id: &str, name: &str, steps: Vec<ScenarioStep>, max_duration: u64) -> Scenario {
    let initial_step = steps.first().map(|s| s.id.clone()).unwrap_or_default();
    Scenario {
        id: id.to_string(),
        name: name.to_string(),
        initial_step,
        steps: steps.into_iter().map(|s| (s.id.clone(), s)).collect(),
        max_duration: Some(max_duration),
        interruptible: true,
    }
}

fn create_login_scenario() -> Scenario {
    let mut email = step("email", "📧 Enter your email address:", Some("password"));
    email.validation = rule(InputType::Email, "Please enter a valid email address");

    let mut password = step("password", "🔑 Enter your password:", None);
    password.sensitive = true;

    scenario(LOGIN, "Login", vec![email, password], 600)
}

fn create_register_scenario() -> Scenario {
    let mut username = step("username", "👤 Choose a username:", Some("email"));
    username.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(3),
        max_length: Some(80),
        pattern: Some(r"^[A-Za-z0-9_.\-]+$".to_string()),
        error_message: Some("Username should be 3-80 characters: letters, digits, dots, dashes or underscores".to_string()),
    });

    let mut email = step("email", "📧 Enter your email address:", Some("phone"));
    email.validation = rule(InputType::Email, "Please enter a valid email address");

    let mut phone = step("phone", "📱 Phone number (or \"skip\"):", Some("password"));
    phone.skippable = true;
    phone.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: None,
        max_length: None,
        pattern: Some(r"^\+?[0-9]{10,15}$".to_string()),
        error_message: Some("Invalid phone number format".to_string()),
    });

    let mut password = step("password", "🔑 Choose a password (at least 8 characters):", Some("confirm_password"));
    password.sensitive = true;
    password.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(8),
        max_length: None,
        pattern: None,
        error_message: Some("Password must be at least 8 characters".to_string()),
    });

    let mut confirm = step("confirm_password", "🔑 Repeat the password:", Some("role"));
    confirm.sensitive = true;

    let mut role = step("role", "🎭 Join as attendee or organizer?", None);
    role.validation = rule(
        InputType::Choice(vec!["attendee".to_string(), "organizer".to_string()]),
        "Invalid role selection",
    );

    scenario(REGISTER, "Registration", vec![username, email, phone, password, confirm, role], 1800)
}

fn create_event_creation_scenario() -> Scenario {
    let mut title = step("title", "📝 Event title:", Some("description"));
    title.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(1),
        max_length: Some(200),
        pattern: None,
        error_message: Some("Event title should be 1-200 characters".to_string()),
    });

    let mut description = step("description", "🗒 Description (or \"skip\"):", Some("category"));
    description.skippable = true;

    let mut category = step("category", "🏷 Category:", Some("venue"));
    category.skippable = true;
    category.validation = rule(
        InputType::Choice(CATEGORIES.iter().map(|c| c.to_string()).collect()),
        &format!("Please pick one of: {}", CATEGORIES.join(", ")),
    );

    let mut venue = step("venue", "📍 Venue:", Some("address"));
    venue.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(1),
        max_length: Some(200),
        pattern: None,
        error_message: Some("Venue is required".to_string()),
    });

    let mut address = step("address", "🏠 Street address (or \"skip\"):", Some("city"));
    address.skippable = true;

    let mut city = step("city", &format!("🏙 City ({} …, or \"skip\"):", CITIES[..3].join(", ")), Some("start_date"));
    city.skippable = true;

    let mut start_date = step("start_date", "📅 Start date (YYYY-MM-DD):", Some("start_time"));
    start_date.validation = rule(InputType::Date, "Please provide a valid date (YYYY-MM-DD)");

    let mut start_time = step("start_time", "🕐 Start time (HH:MM, or \"skip\" for 00:00):", Some("end_date"));
    start_time.skippable = true;
    start_time.validation = rule(InputType::Time, "Please provide a valid time (HH:MM)");

    let mut end_date = step("end_date", "📅 End date (YYYY-MM-DD, or \"skip\"):", Some("end_time"));
    end_date.skippable = true;
    end_date.validation = rule(InputType::Date, "Please provide a valid date (YYYY-MM-DD)");

    let mut end_time = step("end_time", "🕐 End time (HH:MM, or \"skip\"):", Some("capacity"));
    end_time.skippable = true;
    end_time.validation = rule(InputType::Time, "Please provide a valid time (HH:MM)");

    let mut capacity = step("capacity", "👥 Capacity (or \"skip\"):", Some("price"));
    capacity.skippable = true;
    capacity.validation = Some(StepValidation {
        input_type: InputType::Number,
        min_length: None,
        max_length: None,
        pattern: Some(r"^[0-9]+$".to_string()),
        error_message: Some("Capacity must be a positive number".to_string()),
    });

    let mut price = step("price", "💰 Ticket price in KES (or \"skip\" for free):", Some("poster_url"));
    price.skippable = true;
    price.validation = rule(InputType::Number, "Ticket price must be a number");

    let mut poster = step("poster_url", "🖼 Send a poster image, paste an image URL, or \"skip\":", Some("confirmation"));
    poster.skippable = true;

    let mut confirmation = step("confirmation", "Submit this event for approval? (confirm / cancel)", None);
    confirmation.validation = rule(
        InputType::Choice(vec!["confirm".to_string(), "cancel".to_string()]),
        "Please confirm or cancel",
    );

    scenario(
        CREATE_EVENT,
        "Event Creation",
        vec![
            title, description, category, venue, address, city, start_date, start_time, end_date,
            end_time, capacity, price, poster, confirmation,
        ],
        3600,
    )
}

fn create_search_scenario() -> Scenario {
    let mut query = step("query", "🔍 What are you looking for? (title, venue or description)", None);
    query.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(1),
        max_length: Some(100),
        pattern: None,
        error_message: Some("Search text should be 1-100 characters".to_string()),
    });

    scenario(SEARCH, "Event Search", vec![query], 600)
}

fn create_review_scenario() -> Scenario {
    let mut rating = step("rating", "⭐ Rate the event from 1 to 5:", Some("comment"));
    rating.validation = Some(StepValidation {
        input_type: InputType::Number,
        min_length: None,
        max_length: None,
        pattern: Some(r"^[1-5]$".to_string()),
        error_message: Some("Rating must be between 1 and 5".to_string()),
    });

    let mut comment = step("comment", "💬 Any comments? (or \"skip\")", None);
    comment.skippable = true;
    comment.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: None,
        max_length: Some(1000),
        pattern: None,
        error_message: None,
    });

    scenario(REVIEW, "Event Review", vec![rating, comment], 1800)
}

fn create_change_password_scenario() -> Scenario {
    let mut current = step("current_password", "🔑 Enter your current password:", Some("new_password"));
    current.sensitive = true;

    let mut new_password = step("new_password", "🔑 Choose a new password (at least 8 characters):", Some("confirm_password"));
    new_password.sensitive = true;
    new_password.validation = Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(8),
        max_length: None,
        pattern: None,
        error_message: Some("Password must be at least 8 characters".to_string()),
    });

    let mut confirm = step("confirm_password", "🔑 Repeat the new password:", None);
    confirm.sensitive = true;

    scenario(CHANGE_PASSWORD, "Change Password", vec![current, new_password, confirm], 600)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_creation() {
        let manager = ScenarioManager::new();

        for id in [LOGIN, REGISTER, CREATE_EVENT, SEARCH, REVIEW, CHANGE_PASSWORD] {
            assert!(manager.get_scenario(id).is_some(), "missing scenario {}", id);
        }
        assert!(manager.get_scenario("onboarding").is_none());
    }

    #[test]
    fn test_login_flow() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);

        manager.start_scenario(&mut context, LOGIN).unwrap();
        assert!(context.is_at(LOGIN, "email"));
        assert!(manager.validate_input(&context, "jane@example.com").is_ok());
        assert!(manager.validate_input(&context, "jane").is_err());

        let step = manager.advance(&mut context).unwrap().unwrap();
        assert_eq!(step.id, "password");
        assert!(step.sensitive);
        assert!(manager.advance(&mut context).unwrap().is_none());
    }

    #[test]
    fn test_register_password_and_role_rules() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(1);
        manager.start_scenario(&mut context, REGISTER).unwrap();

        context.next_step("password").unwrap();
        let err = manager.validate_input(&context, "short").unwrap_err();
        assert_eq!(err.user_message(), "Password must be at least 8 characters");

        context.next_step("role").unwrap();
        assert!(manager.validate_input(&context, "Organizer").is_ok());
        let err = manager.validate_input(&context, "admin").unwrap_err();
        assert_eq!(err.user_message(), "Invalid role selection");
    }

    #[test]
    fn test_event_creation_walks_every_step() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(1);
        manager.start_scenario(&mut context, CREATE_EVENT).unwrap();

        let mut visited = vec![context.step.clone().unwrap()];
        while let Some(step) = manager.advance(&mut context).unwrap() {
            visited.push(step.id);
        }
        assert_eq!(visited.first().map(String::as_str), Some("title"));
        assert_eq!(visited.last().map(String::as_str), Some("confirmation"));
        assert_eq!(visited.len(), 14);
    }

    #[test]
    fn test_review_rating_bounds() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(1);
        manager.start_scenario(&mut context, REVIEW).unwrap();

        assert!(manager.validate_input(&context, "5").is_ok());
        assert!(manager.validate_input(&context, "0").is_err());
        assert!(manager.validate_input(&context, "6").is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(123);
        manager.start_scenario(&mut context, REGISTER).unwrap();

        assert!(manager.next_step(&mut context, "role").is_err());
        assert!(manager.next_step(&mut context, "nonexistent").is_err());
        assert!(manager.next_step(&mut context, "email").is_ok());
    }
}
