//! Admin command handlers

use teloxide::{Bot, types::{Message, ChatId, MessageId}, prelude::*};
use tracing::{debug, info};
use crate::utils::errors::{Event360Error, Result};
use crate::utils::logging::log_admin_action;
use crate::services::ServiceFactory;
use crate::models::{ApprovalAction, ApproveEventRequest, Role, UpdateRoleRequest, UpdateStatusRequest};
use crate::middleware::Route;
use crate::handlers::callbacks::AdminSection;
use crate::handlers::{require, show, views};

/// Handle /admin command - show admin panel
pub async fn handle_admin_panel(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, "Processing /admin command");
    if require(&bot, chat_id, &services, Route::AdminPanel).await?.is_none() {
        return Ok(());
    }

    let stats = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.admin().statistics().await })
        .await?;
    let (text, keyboard) = views::admin_panel(&stats, services.settings.features.admin_tools);
    show(&bot, chat_id, None, text, Some(keyboard)).await
}

/// Handle /stats command
pub async fn handle_stats(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    show_section(&bot, msg.chat.id, None, &services, AdminSection::Stats).await
}

/// Render one section of the admin panel
pub async fn show_section(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    section: AdminSection,
) -> Result<()> {
    let route = match section {
        AdminSection::Pending => Route::Approvals,
        AdminSection::Users => Route::Users,
        AdminSection::Orders => Route::OrdersOverview,
        AdminSection::Stats => Route::Statistics,
        AdminSection::Seed => Route::Tools,
    };
    let Some(session) = require(bot, chat_id, services, route).await? else {
        return Ok(());
    };
    let sessions = &services.session_service;

    match section {
        AdminSection::Pending => {
            let pending = sessions
                .call(chat_id.0, |api, _| async move { api.admin().pending_events().await })
                .await?;
            if pending.is_empty() {
                return show(bot, chat_id, message_id, "✅ No events awaiting approval.".to_string(), None).await;
            }
            bot.send_message(chat_id, format!("📋 {} event(s) awaiting approval", pending.len())).await?;
            for event in &pending {
                let (text, keyboard) = views::pending_event(event);
                bot.send_message(chat_id, text).reply_markup(keyboard).await?;
            }
            Ok(())
        }
        AdminSection::Users => {
            let users = sessions
                .call(chat_id.0, |api, _| async move { api.users().list().await })
                .await?;
            let (text, keyboard) = views::users(&users);
            show(bot, chat_id, message_id, text, Some(keyboard)).await
        }
        AdminSection::Orders => {
            let orders = sessions
                .call(chat_id.0, |api, _| async move { api.admin().orders().await })
                .await?;
            show(bot, chat_id, message_id, views::admin_orders(&orders), None).await
        }
        AdminSection::Stats => {
            let stats = sessions
                .call(chat_id.0, |api, _| async move { api.admin().statistics().await })
                .await?;
            show(bot, chat_id, message_id, views::statistics(&stats), None).await
        }
        AdminSection::Seed => {
            if !services.settings.features.admin_tools {
                return Err(Event360Error::PermissionDenied("Admin tools are disabled".to_string()));
            }
            let response = sessions
                .call(chat_id.0, |api, _| async move { api.admin().seed_database().await })
                .await?;
            log_admin_action(session.user.id, "seed_database", None, None);
            bot.send_message(chat_id, response.message.unwrap_or_else(|| "Database seeded.".to_string())).await?;
            Ok(())
        }
    }
}

/// Approve or reject a pending event
pub async fn decide(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    event_id: i64,
    action: ApprovalAction,
) -> Result<()> {
    let Some(session) = require(bot, chat_id, services, Route::Approvals).await? else {
        return Ok(());
    };

    let request = ApproveEventRequest { action, comment: String::new() };
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.admin().approve_event(event_id, &request).await })
        .await?;

    log_admin_action(session.user.id, action.as_str(), Some(&event_id.to_string()), Some(&response.event.title));
    info!(event_id = event_id, action = action.as_str(), "Event reviewed");
    let text = format!(
        "{} {} has been {}.",
        if action == ApprovalAction::Approve { "✅" } else { "❌" },
        response.event.title,
        action.past_tense()
    );
    show(bot, chat_id, message_id, text, None).await
}

pub async fn show_user(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    user_id: i64,
) -> Result<()> {
    if require(bot, chat_id, services, Route::Users).await?.is_none() {
        return Ok(());
    }
    let user = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.users().get(user_id).await })
        .await?;
    let (text, keyboard) = views::user_admin(&user);
    show(bot, chat_id, message_id, text, Some(keyboard)).await
}

pub async fn set_role(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    user_id: i64,
    role: Role,
) -> Result<()> {
    let Some(session) = require(bot, chat_id, services, Route::Users).await? else {
        return Ok(());
    };
    let request = UpdateRoleRequest { role };
    let mut response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.admin().update_user_role(user_id, &request).await })
        .await?;
    // the response user only carries role_id
    response.user.role.get_or_insert(role);

    log_admin_action(session.user.id, "update_role", Some(&user_id.to_string()), Some(role.as_str()));
    let (text, keyboard) = views::user_admin(&response.user);
    show(bot, chat_id, message_id, text, Some(keyboard)).await
}

pub async fn set_status(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    user_id: i64,
    active: bool,
) -> Result<()> {
    let Some(session) = require(bot, chat_id, services, Route::Users).await? else {
        return Ok(());
    };
    let request = UpdateStatusRequest { status: active };
    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.admin().toggle_user_status(user_id, &request).await })
        .await?;

    let action = if active { "activate_user" } else { "deactivate_user" };
    log_admin_action(session.user.id, action, Some(&user_id.to_string()), None);
    let (text, keyboard) = views::user_admin(&response.user);
    show(bot, chat_id, message_id, text, Some(keyboard)).await
}
