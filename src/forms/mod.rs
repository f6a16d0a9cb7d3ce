//! Form validation
//!
//! Each form collects raw text answers and either produces the request body
//! for the API or blocks submission with the message shown to the user.

pub mod account;
pub mod event;
pub mod upload;

pub use account::{ChangePasswordForm, LoginForm, RegisterForm, MIN_PASSWORD_LENGTH};
pub use event::{EventForm, ReviewForm, DEFAULT_COUNTRY};
pub use upload::{validate_image, MAX_IMAGE_BYTES};

use crate::state::ConversationContext;
use crate::utils::errors::Event360Error;

pub(crate) fn blocked(message: &str) -> Event360Error {
    Event360Error::Validation(message.to_string())
}

/// Trimmed answer, `None` when blank
pub(crate) fn answer(context: &ConversationContext, key: &str) -> Option<String> {
    context
        .get_string(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
