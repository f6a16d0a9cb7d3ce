//! Login, registration and password forms

use crate::models::{ChangePasswordRequest, LoginRequest, RegisterRequest, Role};
use crate::state::ConversationContext;
use crate::utils::errors::Result;
use super::{answer, blocked};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_context(context: &ConversationContext) -> Self {
        Self {
            email: answer(context, "email").unwrap_or_default(),
            password: context.get_string("password").unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(blocked("Please enter your email and password"));
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl RegisterForm {
    pub fn from_context(context: &ConversationContext) -> Self {
        Self {
            username: answer(context, "username").unwrap_or_default(),
            email: answer(context, "email").unwrap_or_default(),
            phone: answer(context, "phone"),
            password: context.get_string("password").unwrap_or_default(),
            confirm_password: context.get_string("confirm_password").unwrap_or_default(),
            role: answer(context, "role").unwrap_or_else(|| Role::Attendee.to_string()),
        }
    }

    /// Checks run in the order the sign-up page shows them
    pub fn validate(&self) -> Result<RegisterRequest> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(blocked("Please fill in all required fields"));
        }
        if self.password != self.confirm_password {
            return Err(blocked("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(blocked("Password must be at least 8 characters"));
        }
        let role = match self.role.parse::<Role>() {
            Ok(role @ (Role::Attendee | Role::Organizer)) => role,
            _ => return Err(blocked("Invalid role selection")),
        };

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            role,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordForm {
    pub fn from_context(context: &ConversationContext) -> Self {
        Self {
            current_password: context.get_string("current_password").unwrap_or_default(),
            new_password: context.get_string("new_password").unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ChangePasswordRequest> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err(blocked("Please enter your current and new password"));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(blocked("Password must be at least 8 characters"));
        }
        Ok(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}
