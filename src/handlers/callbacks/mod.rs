//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

pub mod action;

pub use action::{AdminSection, CallbackAction};

use teloxide::{Bot, types::{CallbackQuery, ChatId, MaybeInaccessibleMessage}, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::{Event360Error, Result};
use crate::services::ServiceFactory;
use crate::state::{scenarios, ScenarioManager, StateStorage};
use crate::listing::{FilterKey, ListingState};
use crate::middleware::Route;
use crate::handlers::commands::{account, admin, events};
use crate::handlers::{report_error, require, start_form, views};

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));
    let message_id = match &query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => Some(message.id),
        _ => None,
    };

    // Answer the callback query first to remove loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data else {
        return Ok(());
    };
    debug!(chat_id = chat_id.0, callback_data = %data, "Processing callback query");

    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            warn!(data = %data, error = %e, "Unknown callback action");
            return Ok(());
        }
    };

    let result = dispatch(&bot, chat_id, message_id, action, &services, &scenario_manager, &state_storage).await;
    match result {
        Err(e) if !matches!(e, Event360Error::Telegram(_)) => report_error(&bot, chat_id, &e).await,
        other => other,
    }
}

async fn dispatch(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<teloxide::types::MessageId>,
    action: CallbackAction,
    services: &ServiceFactory,
    scenario_manager: &ScenarioManager,
    state_storage: &StateStorage,
) -> Result<()> {
    match action {
        CallbackAction::Page(page) => {
            let mut state = current_listing(state_storage, chat_id).await?;
            state.page = page.max(1);
            events::show_events(bot, chat_id, message_id, services, state_storage, state).await
        }
        CallbackAction::Filter(FilterKey::Search) => {
            start_form(bot, chat_id, scenario_manager, state_storage, scenarios::SEARCH, &[]).await
        }
        CallbackAction::Filter(key) => {
            bot.send_message(chat_id, format!("Choose a {}:", key))
                .reply_markup(views::filter_choices(key))
                .await?;
            Ok(())
        }
        CallbackAction::SetFilter(key, choice) => {
            let value = match choice {
                Some(index) => key
                    .choices()
                    .get(index)
                    .copied()
                    .ok_or_else(|| Event360Error::InvalidInput(format!("Unknown {} choice", key)))?,
                None => "",
            };
            let mut state = current_listing(state_storage, chat_id).await?;
            state.set_filter(key, value);
            events::show_events(bot, chat_id, None, services, state_storage, state).await
        }
        CallbackAction::ClearFilters => {
            events::show_events(bot, chat_id, message_id, services, state_storage, ListingState::default()).await
        }
        CallbackAction::Event(event_id) => events::show_event_details(bot, chat_id, None, services, event_id).await,
        CallbackAction::WishAdd(event_id) => account::update_wishlist(bot, chat_id, services, event_id, true).await,
        CallbackAction::WishRemove(event_id) => account::update_wishlist(bot, chat_id, services, event_id, false).await,
        CallbackAction::Buy { ticket_type_id, quantity } => {
            account::purchase(bot, chat_id, services, ticket_type_id, quantity).await
        }
        CallbackAction::RegisterFor(event_id) => account::register_for_event(bot, chat_id, services, event_id).await,
        CallbackAction::Review(event_id) => {
            if require(bot, chat_id, services, Route::Review).await?.is_none() {
                return Ok(());
            }
            start_form(
                bot,
                chat_id,
                scenario_manager,
                state_storage,
                scenarios::REVIEW,
                &[("event_id", serde_json::json!(event_id))],
            )
            .await
        }
        CallbackAction::Order(order_id) => account::show_order(bot, chat_id, message_id, services, order_id).await,
        CallbackAction::Pay(order_id) => account::pay(bot, chat_id, services, order_id).await,
        CallbackAction::CancelOrder(order_id) => account::cancel_order(bot, chat_id, services, order_id).await,
        CallbackAction::MarkRead(notification_id) => account::mark_read(bot, chat_id, services, notification_id).await,
        CallbackAction::Admin(section) => admin::show_section(bot, chat_id, message_id, services, section).await,
        CallbackAction::Decide(event_id, decision) => {
            admin::decide(bot, chat_id, message_id, services, event_id, decision).await
        }
        CallbackAction::User(user_id) => admin::show_user(bot, chat_id, message_id, services, user_id).await,
        CallbackAction::SetRole(user_id, role) => admin::set_role(bot, chat_id, message_id, services, user_id, role).await,
        CallbackAction::SetStatus(user_id, active) => {
            admin::set_status(bot, chat_id, message_id, services, user_id, active).await
        }
    }
}

async fn current_listing(state_storage: &StateStorage, chat_id: ChatId) -> Result<ListingState> {
    Ok(state_storage.load_listing(chat_id.0).await?.unwrap_or_default())
}
