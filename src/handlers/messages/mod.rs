//! Message handlers module
//!
//! Plain messages answer the current step of the chat's active form. When
//! the last step is answered the collected values go through form
//! validation and on to the API.

use teloxide::{Bot, types::{Message, ChatId}, prelude::*, net::Download};
use tracing::{debug, info, warn};
use crate::utils::errors::{Event360Error, Result};
use crate::utils::logging::log_user_action;
use crate::services::ServiceFactory;
use crate::state::{scenarios, ConversationContext, ScenarioManager, ScenarioStep, StateStorage};
use crate::forms::{validate_image, ChangePasswordForm, EventForm, LoginForm, RegisterForm, ReviewForm};
use crate::listing::FilterKey;
use crate::middleware::Route;
use crate::handlers::commands::events;
use crate::handlers::{report_error, require, views};

const POSTER_STEP: &str = "poster_url";
const CONFIRMATION_STEP: &str = "confirmation";

/// Handle incoming messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;

    match state_storage.load_context(chat_id.0).await? {
        Some(context) if context.is_active() => {
            let result = handle_form_input(&bot, &msg, context, &services, &scenario_manager, &state_storage).await;
            match result {
                Err(e) if !matches!(e, Event360Error::Telegram(_)) => report_error(&bot, chat_id, &e).await,
                other => other,
            }
        }
        _ => handle_regular_message(bot, msg).await,
    }
}

async fn handle_form_input(
    bot: &Bot,
    msg: &Message,
    mut context: ConversationContext,
    services: &ServiceFactory,
    scenario_manager: &ScenarioManager,
    state_storage: &StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let step = scenario_manager.get_current_step(&context)?.clone();
    debug!(chat_id = chat_id.0, scenario = ?context.scenario, step = %step.id, "Handling form input");

    let answer = if step.id == POSTER_STEP && (msg.photo().is_some() || msg.document().is_some()) {
        Some(upload_poster(bot, msg, services).await?)
    } else {
        let Some(text) = msg.text() else {
            bot.send_message(chat_id, format!("Please answer with text.\n\n{}", step.prompt)).await?;
            return Ok(());
        };
        if step.sensitive {
            if let Err(e) = bot.delete_message(chat_id, msg.id).await {
                debug!(error = %e, "Could not delete sensitive answer");
            }
        }

        if step.skippable && text.trim().eq_ignore_ascii_case("skip") {
            None
        } else {
            if let Err(e) = scenario_manager.validate_input(&context, text) {
                bot.send_message(chat_id, format!("❌ {}\n\n{}", e.user_message(), step.prompt)).await?;
                return Ok(());
            }
            Some(if step.sensitive { text.to_string() } else { text.trim().to_string() })
        }
    };

    if let Some(original) = confirms(context.scenario.as_deref(), &step.id) {
        if answer != context.get_string(original) {
            context.remove_data(original);
            context.next_step(original)?;
            state_storage.save_context(&context).await?;
            let prompt = scenario_manager.get_current_step(&context)?.prompt.clone();
            bot.send_message(chat_id, format!("❌ Passwords do not match\n\n{}", prompt)).await?;
            return Ok(());
        }
    }

    if let Some(answer) = answer {
        context.set_data(&step.id, answer)?;
    }

    match scenario_manager.advance(&mut context)? {
        Some(next) => prompt_next(bot, chat_id, context, &next, state_storage).await,
        None => {
            state_storage.delete_context(chat_id.0).await?;
            finish_form(bot, chat_id, &context, services, state_storage).await
        }
    }
}

/// Step whose answer a confirmation step must repeat
fn confirms(scenario: Option<&str>, step: &str) -> Option<&'static str> {
    match (scenario, step) {
        (Some(scenarios::REGISTER), "confirm_password") => Some("password"),
        (Some(scenarios::CHANGE_PASSWORD), "confirm_password") => Some("new_password"),
        _ => None,
    }
}

async fn prompt_next(
    bot: &Bot,
    chat_id: ChatId,
    context: ConversationContext,
    next: &ScenarioStep,
    state_storage: &StateStorage,
) -> Result<()> {
    let text = if next.id == CONFIRMATION_STEP {
        match EventForm::from_context(&context).validate() {
            Ok(request) => format!("{}\n{}", views::event_summary(&request), next.prompt),
            Err(e) => {
                state_storage.delete_context(chat_id.0).await?;
                bot.send_message(chat_id, format!("❌ {}\nStart again with /createevent.", e.user_message()))
                    .await?;
                return Ok(());
            }
        }
    } else if next.id == POSTER_STEP {
        format!("{}\n{}", next.prompt, views::upload_hint())
    } else {
        next.prompt.clone()
    };

    state_storage.save_context(&context).await?;
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Submit the completed form
async fn finish_form(
    bot: &Bot,
    chat_id: ChatId,
    context: &ConversationContext,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    let scenario = context.scenario.as_deref().unwrap_or_default();
    info!(chat_id = chat_id.0, scenario = scenario, "Form completed");

    match scenario {
        scenarios::LOGIN => {
            let credentials = LoginForm::from_context(context).validate()?;
            let session = services.auth_service.login(chat_id.0, &credentials).await?;
            bot.send_message(
                chat_id,
                format!("✅ Welcome back, {}! See /dashboard or browse /events.", session.user.username),
            )
            .await?;
        }
        scenarios::REGISTER => {
            let form = RegisterForm::from_context(context).validate()?;
            let session = services.auth_service.register(chat_id.0, &form).await?;
            bot.send_message(
                chat_id,
                format!("🎉 Welcome to Event360, {}! You're signed in as {}.", session.user.username, session.user.role().label()),
            )
            .await?;
        }
        scenarios::CREATE_EVENT => {
            let confirmed = context
                .get_string(CONFIRMATION_STEP)
                .map_or(false, |answer| answer.eq_ignore_ascii_case("confirm"));
            if !confirmed {
                bot.send_message(chat_id, "Event discarded.").await?;
                return Ok(());
            }
            if require(bot, chat_id, services, Route::CreateEvent).await?.is_none() {
                return Ok(());
            }

            let request = EventForm::from_context(context).validate()?;
            let response = services
                .session_service
                .call(chat_id.0, |api, _| async move { api.events().create(&request).await })
                .await?;
            log_user_action(chat_id.0, "event_submitted", Some(&response.event.id.to_string()));
            bot.send_message(
                chat_id,
                format!("✅ \"{}\" was submitted and is waiting for admin approval.", response.event.title),
            )
            .await?;
        }
        scenarios::SEARCH => {
            let query = context.get_string("query").unwrap_or_default();
            let mut state = state_storage.load_listing(chat_id.0).await?.unwrap_or_default();
            state.set_filter(FilterKey::Search, &query);
            events::show_events(bot, chat_id, None, services, state_storage, state).await?;
        }
        scenarios::REVIEW => {
            let event_id = context
                .get_i64("event_id")
                .ok_or_else(|| Event360Error::InvalidInput("No event selected for the review".to_string()))?;
            let review = ReviewForm::from_context(context).validate()?;
            if require(bot, chat_id, services, Route::Review).await?.is_none() {
                return Ok(());
            }
            let response = services
                .session_service
                .call(chat_id.0, |api, _| async move { api.events().create_review(event_id, &review).await })
                .await?;
            bot.send_message(chat_id, response.message.unwrap_or_else(|| "⭐ Thanks for your review!".to_string()))
                .await?;
        }
        scenarios::CHANGE_PASSWORD => {
            let request = ChangePasswordForm::from_context(context).validate()?;
            let response = services
                .session_service
                .call(chat_id.0, |api, session| async move {
                    api.users().change_password(session.user.id, &request).await
                })
                .await?;
            log_user_action(chat_id.0, "password_changed", None);
            bot.send_message(chat_id, response.message.unwrap_or_else(|| "✅ Password updated.".to_string()))
                .await?;
        }
        other => warn!(chat_id = chat_id.0, scenario = other, "Completed unknown form"),
    }
    Ok(())
}

/// Check, download and re-upload a poster image, returning its hosted URL
async fn upload_poster(bot: &Bot, msg: &Message, services: &ServiceFactory) -> Result<String> {
    if !services.settings.features.image_uploads {
        return Err(Event360Error::Validation(
            "Image uploads are disabled. Paste an image URL or send \"skip\".".to_string(),
        ));
    }

    let (file_id, size, content_type, file_name) = if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        (photo.file.id.clone(), photo.file.size, Some("image/jpeg".to_string()), "poster.jpg".to_string())
    } else if let Some(document) = msg.document() {
        (
            document.file.id.clone(),
            document.file.size,
            document.mime_type.as_ref().map(|mime| mime.to_string()),
            document.file_name.clone().unwrap_or_else(|| "poster".to_string()),
        )
    } else {
        return Err(Event360Error::Validation("Please upload an image file".to_string()));
    };

    validate_image(content_type.as_deref(), u64::from(size))?;
    let content_type = content_type.unwrap_or_default();

    let file = bot.get_file(file_id).await?;
    let mut bytes = Vec::with_capacity(size as usize);
    bot.download_file(&file.path, &mut bytes)
        .await
        .map_err(|e| Event360Error::InvalidInput(format!("Could not download the image: {}", e)))?;

    let url = services
        .session_service
        .call(msg.chat.id.0, |api, _| async move {
            api.uploads().upload_image(&file_name, &content_type, bytes).await
        })
        .await?;
    info!(chat_id = msg.chat.id.0, url = %url, "Poster uploaded");
    Ok(url)
}

/// Handle regular messages (no active form)
async fn handle_regular_message(bot: Bot, msg: Message) -> Result<()> {
    if msg.chat.is_private() {
        bot.send_message(msg.chat.id, "Use /events to browse events or /help to see everything I can do.")
            .await?;
    }
    Ok(())
}
