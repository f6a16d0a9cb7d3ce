//! Start command handler
//!
//! Home page, sign-in and sign-out, and form cancellation.

use chrono::Utc;
use teloxide::{Bot, types::{Message, ChatId}, prelude::*};
use tracing::{debug, info, warn};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use crate::services::ServiceFactory;
use crate::state::{scenarios, ScenarioManager, StateStorage};
use crate::listing::EventFilters;
use crate::models::Event;
use crate::handlers::{start_form, views};

/// Handle /start - home page with the next few upcoming events
pub async fn handle_start(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, "Processing /start command");

    let session = services.storage.load_session(chat_id.0).await?;
    let featured = match featured_events(&services, chat_id).await {
        Ok(events) => events,
        Err(e) => {
            warn!(chat_id = chat_id.0, error = %e, "Could not load featured events");
            Vec::new()
        }
    };

    bot.send_message(chat_id, views::welcome(&featured, session.as_ref()))
        .reply_markup(views::welcome_keyboard(&featured))
        .await?;

    log_user_action(chat_id.0, "start", None);
    Ok(())
}

async fn featured_events(services: &ServiceFactory, chat_id: ChatId) -> Result<Vec<Event>> {
    let client = services.session_service.client(chat_id.0).await?;
    let now = Utc::now();
    let mut events: Vec<Event> = client
        .events()
        .list(&EventFilters::default().api_params(1, services.settings.listing.page_size))
        .await?
        .into_iter()
        .filter(|event| event.start_time > now)
        .collect();
    events.sort_by_key(|event| event.start_time);
    events.truncate(services.settings.listing.featured_count);
    Ok(events)
}

/// Handle /login
pub async fn handle_login(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if let Some(session) = services.storage.load_session(chat_id.0).await? {
        bot.send_message(
            chat_id,
            format!("You're already signed in as {}. Use /logout to switch accounts.", session.user.username),
        )
        .await?;
        return Ok(());
    }

    start_form(&bot, chat_id, &scenario_manager, &state_storage, scenarios::LOGIN, &[]).await
}

/// Handle /register
pub async fn handle_register(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if services.auth_service.is_authenticated(chat_id.0).await? {
        bot.send_message(chat_id, "You already have an account. Use /logout first to create another.").await?;
        return Ok(());
    }

    start_form(&bot, chat_id, &scenario_manager, &state_storage, scenarios::REGISTER, &[]).await
}

/// Handle /logout
pub async fn handle_logout(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    services.auth_service.logout(chat_id.0).await?;
    bot.send_message(chat_id, "👋 You have been signed out.").await?;
    info!(chat_id = chat_id.0, "User logged out");
    Ok(())
}

/// Handle /cancel
pub async fn handle_cancel(bot: Bot, msg: Message, state_storage: StateStorage) -> Result<()> {
    let chat_id = msg.chat.id;
    let text = match state_storage.load_context(chat_id.0).await? {
        Some(context) if context.is_active() => {
            state_storage.delete_context(chat_id.0).await?;
            log_user_action(chat_id.0, "cancel_form", context.scenario.as_deref());
            "Cancelled."
        }
        _ => "There is nothing to cancel.",
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Drop an interruptible form when the user moves to another page
pub async fn interrupt_form(chat_id: ChatId, scenario_manager: &ScenarioManager, state_storage: &StateStorage) -> Result<()> {
    if let Some(context) = state_storage.load_context(chat_id.0).await? {
        if let Some(scenario) = context.scenario.as_deref() {
            if scenario_manager.can_interrupt(scenario) {
                debug!(chat_id = chat_id.0, scenario = scenario, "Abandoning form for a new command");
                state_storage.delete_context(chat_id.0).await?;
            }
        }
    }
    Ok(())
}
