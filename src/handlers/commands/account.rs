//! Account pages: profile, dashboard, tickets, orders and notifications
//!
//! Purchase and wishlist helpers here are shared with the callback handlers.

use chrono::Utc;
use teloxide::{Bot, types::{Message, ChatId, MessageId}, prelude::*};
use tracing::info;
use crate::utils::errors::{Event360Error, Result};
use crate::utils::helpers::split_first_arg;
use crate::utils::logging::log_user_action;
use crate::services::ServiceFactory;
use crate::state::{scenarios, ScenarioManager, StateStorage};
use crate::models::{CreateOrderRequest, CreateRegistrationRequest, PaymentRequest};
use crate::middleware::Route;
use crate::handlers::{require, show, start_form, views};

const MAX_QUANTITY: u32 = 10;

/// Handle /me
pub async fn handle_profile(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Profile).await?.is_none() {
        return Ok(());
    }

    match services.auth_service.refresh_user(chat_id.0).await? {
        Some(user) => bot.send_message(chat_id, views::profile(&user)).await?,
        None => bot.send_message(chat_id, views::access_denied(&crate::middleware::Access::RedirectToLogin)).await?,
    };
    Ok(())
}

/// Handle /dashboard
pub async fn handle_dashboard(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    let Some(session) = require(&bot, chat_id, &services, Route::Dashboard).await? else {
        return Ok(());
    };

    let tickets = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.tickets().list().await })
        .await?;
    let orders = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().list().await })
        .await?;

    bot.send_message(chat_id, views::dashboard(&session, &tickets, &orders, Utc::now())).await?;
    Ok(())
}

/// Handle /tickets
pub async fn handle_tickets(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Tickets).await?.is_none() {
        return Ok(());
    }

    let tickets = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.tickets().list().await })
        .await?;
    bot.send_message(chat_id, views::tickets(&tickets)).await?;
    Ok(())
}

/// Handle /orders
pub async fn handle_orders(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Orders).await?.is_none() {
        return Ok(());
    }

    let orders = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().list().await })
        .await?;
    let keyboard = (!orders.is_empty()).then(|| views::orders_keyboard(&orders, Utc::now()));
    show(&bot, chat_id, None, views::orders(&orders), keyboard).await
}

pub async fn show_order(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    order_id: i64,
) -> Result<()> {
    if require(bot, chat_id, services, Route::Orders).await?.is_none() {
        return Ok(());
    }
    let details = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().get(order_id).await })
        .await?;
    let keyboard = views::orders_keyboard(std::slice::from_ref(&details.order), Utc::now());
    show(bot, chat_id, message_id, views::order_details(&details), Some(keyboard)).await
}

/// Handle /buy <ticket type id> [quantity]
pub async fn handle_buy(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let usage = || Event360Error::InvalidInput("Usage: /buy <ticket type id> [quantity]".to_string());
    let (ticket_type_id, rest) = split_first_arg(&args);
    let ticket_type_id: i64 = ticket_type_id.and_then(|id| id.parse().ok()).ok_or_else(usage)?;
    let quantity: u32 = match split_first_arg(rest).0 {
        Some(quantity) => quantity.parse().map_err(|_| usage())?,
        None => 1,
    };

    purchase(&bot, msg.chat.id, &services, ticket_type_id, quantity).await
}

/// Place an order for one ticket type
pub async fn purchase(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, ticket_type_id: i64, quantity: u32) -> Result<()> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(Event360Error::Validation(format!("Quantity must be between 1 and {}", MAX_QUANTITY)));
    }
    if require(bot, chat_id, services, Route::Buy).await?.is_none() {
        return Ok(());
    }

    let request = CreateOrderRequest::single(ticket_type_id, quantity);
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().create(&request).await })
        .await?;

    info!(chat_id = chat_id.0, order_id = response.order.id, reference = %response.order.reference, "Order created");
    log_user_action(chat_id.0, "order_created", Some(&response.order.reference));
    show(bot, chat_id, None, views::order_created(&response), views::order_created_keyboard(&response)).await
}

/// Pay an order in full through M-Pesa
pub async fn pay(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, order_id: i64) -> Result<()> {
    if require(bot, chat_id, services, Route::Orders).await?.is_none() {
        return Ok(());
    }

    let details = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().get(order_id).await })
        .await?;
    if details.order.is_paid() {
        bot.send_message(chat_id, format!("Order {} is already paid.", details.order.reference)).await?;
        return Ok(());
    }
    if details.order.is_cancelled() {
        bot.send_message(chat_id, format!("Order {} was cancelled.", details.order.reference)).await?;
        return Ok(());
    }

    let request = PaymentRequest::mpesa(order_id, details.order.total_amount, None);
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.payments().process(&request).await })
        .await?;

    log_user_action(chat_id.0, "payment", Some(&response.order.reference));
    bot.send_message(chat_id, views::payment_result(&response)).await?;
    Ok(())
}

pub async fn cancel_order(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, order_id: i64) -> Result<()> {
    if require(bot, chat_id, services, Route::Orders).await?.is_none() {
        return Ok(());
    }
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.orders().cancel(order_id).await })
        .await?;
    log_user_action(chat_id.0, "order_cancelled", Some(&order_id.to_string()));
    bot.send_message(chat_id, response.message.unwrap_or_else(|| "Order cancelled.".to_string())).await?;
    Ok(())
}

/// Free registration for an event without ticket types
pub async fn register_for_event(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, event_id: i64) -> Result<()> {
    if require(bot, chat_id, services, Route::RegisterForEvent).await?.is_none() {
        return Ok(());
    }
    let response = services
        .session_service
        .call(chat_id.0, |api, session| async move {
            let request = CreateRegistrationRequest {
                user_id: session.user.id,
                event_id,
                quantity: 1,
                registration_type: None,
                notes: None,
            };
            api.registrations().create(&request).await
        })
        .await?;
    bot.send_message(chat_id, response.message.unwrap_or_else(|| "✅ You're registered!".to_string())).await?;
    Ok(())
}

pub async fn update_wishlist(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, event_id: i64, add: bool) -> Result<()> {
    if require(bot, chat_id, services, Route::Wishlist).await?.is_none() {
        return Ok(());
    }
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move {
            if add {
                api.events().add_to_wishlist(event_id).await
            } else {
                api.events().remove_from_wishlist(event_id).await
            }
        })
        .await?;
    let fallback = if add { "❤ Saved to your wishlist." } else { "Removed from your wishlist." };
    bot.send_message(chat_id, response.message.unwrap_or_else(|| fallback.to_string())).await?;
    Ok(())
}

/// Handle /wishlist
pub async fn handle_wishlist(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Wishlist).await?.is_none() {
        return Ok(());
    }

    let items = services
        .session_service
        .call(chat_id.0, |api, session| async move { api.users().wishlist(session.user.id).await })
        .await?;
    let keyboard = (!items.is_empty()).then(|| views::wishlist_keyboard(&items));
    show(&bot, chat_id, None, views::wishlist(&items), keyboard).await
}

/// Handle /password
pub async fn handle_password(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Profile).await?.is_none() {
        return Ok(());
    }
    start_form(&bot, chat_id, &scenario_manager, &state_storage, scenarios::CHANGE_PASSWORD, &[]).await
}

/// Handle /notifications
pub async fn handle_notifications(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::Notifications).await?.is_none() {
        return Ok(());
    }

    let notifications = services
        .session_service
        .call(chat_id.0, |api, session| async move { api.users().notifications(session.user.id).await })
        .await?;
    let keyboard = notifications.iter().any(|n| !n.is_read).then(|| views::notifications_keyboard(&notifications));
    show(&bot, chat_id, None, views::notifications(&notifications), keyboard).await
}

pub async fn mark_read(bot: &Bot, chat_id: ChatId, services: &ServiceFactory, notification_id: i64) -> Result<()> {
    if require(bot, chat_id, services, Route::Notifications).await?.is_none() {
        return Ok(());
    }
    services
        .session_service
        .call(chat_id.0, |api, session| async move {
            api.users().mark_notification_read(session.user.id, notification_id).await
        })
        .await?;
    bot.send_message(chat_id, "✔ Marked as read.").await?;
    Ok(())
}
