//! Forms driven step by step through their scenarios

use assert_matches::assert_matches;
use Event360::forms::{ChangePasswordForm, EventForm, LoginForm, RegisterForm, ReviewForm};
use Event360::models::Role;
use Event360::state::{scenarios, ConversationContext, ScenarioManager};
use Event360::utils::errors::Event360Error;

/// Answer every step in order, validating each answer first
fn fill(manager: &ScenarioManager, scenario: &str, answers: &[&str]) -> ConversationContext {
    let mut context = ConversationContext::new(1);
    manager.start_scenario(&mut context, scenario).unwrap();

    for (i, answer) in answers.iter().enumerate() {
        let step = manager.get_current_step(&context).unwrap().clone();
        if !(step.skippable && *answer == "skip") {
            manager
                .validate_input(&context, answer)
                .unwrap_or_else(|e| panic!("step {} rejected {:?}: {}", step.id, answer, e));
            context.set_data(&step.id, answer.to_string()).unwrap();
        }
        let next = manager.advance(&mut context).unwrap();
        assert_eq!(next.is_none(), i == answers.len() - 1, "scenario length mismatch at {}", step.id);
    }
    context
}

#[test]
fn test_login_form() {
    let manager = ScenarioManager::new();
    let context = fill(&manager, scenarios::LOGIN, &["jane@example.com", "password123"]);

    let request = LoginForm::from_context(&context).validate().unwrap();
    assert_eq!(request.email, "jane@example.com");
}

#[test]
fn test_registration_form() {
    let manager = ScenarioManager::new();
    let context = fill(
        &manager,
        scenarios::REGISTER,
        &["jane_doe", "jane@example.com", "skip", "password123", "password123", "organizer"],
    );

    let request = RegisterForm::from_context(&context).validate().unwrap();
    assert_eq!(request.username, "jane_doe");
    assert_eq!(request.role, Role::Organizer);
    assert!(request.phone.is_none());
}

#[test]
fn test_registration_rejects_admin_role() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(1);
    manager.start_scenario(&mut context, scenarios::REGISTER).unwrap();
    for step in ["username", "email", "phone", "password", "confirm_password"] {
        assert_eq!(manager.get_current_step(&context).unwrap().id, step);
        manager.advance(&mut context).unwrap();
    }

    assert!(manager.validate_input(&context, "admin").is_err());
    assert!(manager.validate_input(&context, "attendee").is_ok());
}

#[test]
fn test_event_form_with_skips() {
    let manager = ScenarioManager::new();
    let context = fill(
        &manager,
        scenarios::CREATE_EVENT,
        &[
            "Nairobi Jazz Night",
            "skip",
            "Music",
            "KICC",
            "skip",
            "Nairobi",
            "2030-03-01",
            "18:30",
            "skip",
            "skip",
            "250",
            "skip",
            "skip",
            "confirm",
        ],
    );

    let request = EventForm::from_context(&context).validate().unwrap();
    assert_eq!(request.title, "Nairobi Jazz Night");
    assert_eq!(request.country, "Kenya");
    assert_eq!(request.capacity, Some(250));
    assert_eq!(request.price, 0.0);
    assert!(request.is_public);
    assert_eq!(request.start_time.to_rfc3339(), "2030-03-01T18:30:00+00:00");
}

#[test]
fn test_review_form() {
    let manager = ScenarioManager::new();
    let context = fill(&manager, scenarios::REVIEW, &["4", "Great sound"]);
    let review = ReviewForm::from_context(&context).validate().unwrap();
    assert_eq!(review.rating, 4);

    let mut bad = ReviewForm::from_context(&context);
    bad.rating = "9".into();
    assert_matches!(bad.validate(), Err(Event360Error::Validation(msg)) if msg == "Rating must be between 1 and 5");
}

#[test]
fn test_change_password_form() {
    let manager = ScenarioManager::new();
    let context = fill(
        &manager,
        scenarios::CHANGE_PASSWORD,
        &["old-secret", "new-secret-42", "new-secret-42"],
    );

    let request = ChangePasswordForm::from_context(&context).validate().unwrap();
    assert_eq!(request.current_password, "old-secret");
    assert_eq!(request.new_password, "new-secret-42");
}

#[test]
fn test_change_password_rejects_short_password() {
    let manager = ScenarioManager::new();
    let mut context = ConversationContext::new(1);
    manager.start_scenario(&mut context, scenarios::CHANGE_PASSWORD).unwrap();
    manager.advance(&mut context).unwrap();

    assert_eq!(manager.get_current_step(&context).unwrap().id, "new_password");
    assert!(manager.validate_input(&context, "short").is_err());
    assert!(manager.validate_input(&context, "long-enough").is_ok());
}
