//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers feeding the active form
//!
//! Text and keyboards come from [`views`].

pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod views;

pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;

use teloxide::{prelude::*, Bot};
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};
use tracing::{error, info, warn};
use crate::middleware::{check, Access, Route};
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, ScenarioManager, Session, StateStorage};
use crate::utils::errors::{ErrorSeverity, Event360Error, Result};

/// Tell the user what went wrong without failing the update
pub async fn report_error(bot: &Bot, chat_id: ChatId, err: &Event360Error) -> Result<()> {
    match err.severity() {
        ErrorSeverity::Info => info!(chat_id = chat_id.0, error = %err, "Request rejected"),
        ErrorSeverity::Warning => warn!(chat_id = chat_id.0, error = %err, "Request failed"),
        _ => error!(chat_id = chat_id.0, error = %err, "Request failed"),
    }
    bot.send_message(chat_id, format!("❌ {}", err.user_message())).await?;
    Ok(())
}

/// Session for a protected route; on refusal the user is told why and `None` is returned
pub async fn require(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, route: Route) -> Result<Option<Session>> {
    let session = services.storage.load_session(chat_id.0).await?;
    match check(session.as_ref(), route) {
        Access::Granted => match session {
            Some(session) => Ok(Some(session)),
            None => {
                bot.send_message(chat_id, views::access_denied(&Access::RedirectToLogin)).await?;
                Ok(None)
            }
        },
        access => {
            warn!(chat_id = chat_id.0, route = %route, access = ?access, "Route guard refused access");
            bot.send_message(chat_id, views::access_denied(&access)).await?;
            Ok(None)
        }
    }
}

/// Edit the originating message when there is one, otherwise send a new one
pub async fn show(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<()> {
    if let Some(message_id) = message_id {
        let mut request = bot.edit_message_text(chat_id, message_id, text.clone());
        if let Some(keyboard) = keyboard.clone() {
            request = request.reply_markup(keyboard);
        }
        match request.await {
            Ok(_) => return Ok(()),
            Err(e) => warn!(chat_id = chat_id.0, error = %e, "Could not edit message, sending a new one"),
        }
    }

    let mut request = bot.send_message(chat_id, text);
    if let Some(keyboard) = keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

/// Start a form and send its first prompt. `seed` values are stored before the first answer.
pub async fn start_form(
    bot: &Bot,
    chat_id: ChatId,
    scenario_manager: &ScenarioManager,
    state_storage: &StateStorage,
    scenario_id: &str,
    seed: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut context = ConversationContext::new(chat_id.0);
    scenario_manager.start_scenario(&mut context, scenario_id)?;
    for (key, value) in seed {
        context.set_data(key, value)?;
    }
    state_storage.save_context(&context).await?;

    let step = scenario_manager.get_current_step(&context)?;
    bot.send_message(chat_id, format!("{}\n\n(/cancel to stop)", step.prompt)).await?;
    info!(chat_id = chat_id.0, scenario = scenario_id, "Form started");
    Ok(())
}
