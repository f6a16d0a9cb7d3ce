//! Help command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::handlers::views;

/// Handle /help; organizer and admin commands are listed only for those roles
pub async fn handle_help(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let session = services.storage.load_session(msg.chat.id.0).await?;
    bot.send_message(msg.chat.id, views::help(session.as_ref())).await?;
    Ok(())
}
