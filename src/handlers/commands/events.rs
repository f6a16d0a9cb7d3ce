//! Event command handlers

use teloxide::{Bot, types::{Message, ChatId, MessageId}, prelude::*};
use tracing::{debug, info};
use crate::utils::errors::{Event360Error, Result};
use crate::utils::helpers::split_first_arg;
use crate::utils::logging::log_user_action;
use crate::services::ServiceFactory;
use crate::state::{scenarios, ScenarioManager, StateStorage};
use crate::listing::{FilterKey, ListingState, Paginator};
use crate::middleware::Route;
use crate::handlers::{require, show, start_form, views};

/// Handle /events [search | query string]
pub async fn handle_events_list(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
    args: String,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let args = args.trim();
    debug!(chat_id = chat_id.0, args = %args, "Processing /events command");

    let state = if args.contains('=') {
        ListingState::from_query(args)
    } else {
        let mut state = ListingState::default();
        state.set_filter(FilterKey::Search, args);
        state
    };

    show_events(&bot, chat_id, None, &services, &state_storage, state).await
}

/// Fetch, filter and paginate the event list, then render the requested page
pub async fn show_events(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    state_storage: &StateStorage,
    mut state: ListingState,
) -> Result<()> {
    let page_size = services.settings.listing.page_size;
    let client = services.session_service.client(chat_id.0).await?;
    let events = client.events().list(&state.filters.api_params(state.page, page_size)).await?;

    let page = Paginator::new(page_size).paginate(state.filters.apply(events), state.page);
    state.page = page.page;
    state_storage.save_listing(chat_id.0, &state).await?;

    show(
        bot,
        chat_id,
        message_id,
        views::event_list(&page, &state),
        Some(views::event_list_keyboard(&page, &state)),
    )
    .await
}

/// Handle /event <id>
pub async fn handle_event(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let event_id = parse_id(&args, "/event <id>")?;
    show_event_details(&bot, msg.chat.id, None, &services, event_id).await
}

pub async fn show_event_details(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    services: &ServiceFactory,
    event_id: i64,
) -> Result<()> {
    let session = services.storage.load_session(chat_id.0).await?;
    let client = services.session_service.client(chat_id.0).await?;
    let details = client
        .events()
        .get(event_id)
        .await
        .map_err(|e| Event360Error::event_lookup(event_id, e))?;

    show(
        bot,
        chat_id,
        message_id,
        views::event_details(&details),
        Some(views::event_details_keyboard(&details, session.as_ref())),
    )
    .await
}

/// Handle /createevent
pub async fn handle_create_event(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::CreateEvent).await?.is_none() {
        return Ok(());
    }

    start_form(&bot, chat_id, &scenario_manager, &state_storage, scenarios::CREATE_EVENT, &[]).await?;
    log_user_action(chat_id.0, "create_event_started", None);
    Ok(())
}

/// Handle /myevents
pub async fn handle_my_events(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::MyEvents).await?.is_none() {
        return Ok(());
    }

    let events = services
        .session_service
        .call(chat_id.0, |api, session| async move { api.users().events(session.user.id).await })
        .await?;
    bot.send_message(chat_id, views::my_events(&events)).await?;
    Ok(())
}

/// Handle /checkin <ticket id>
pub async fn handle_check_in(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::CheckIn).await?.is_none() {
        return Ok(());
    }
    let ticket_id = parse_id(&args, "/checkin <ticket id>")?;

    let response = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.tickets().check_in(ticket_id).await })
        .await?;
    info!(chat_id = chat_id.0, ticket_id = ticket_id, "Ticket checked in");
    bot.send_message(chat_id, views::check_in(&response)).await?;
    Ok(())
}

/// Handle /verify <code>
pub async fn handle_verify(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let chat_id = msg.chat.id;
    if require(&bot, chat_id, &services, Route::CheckIn).await?.is_none() {
        return Ok(());
    }
    let code = match split_first_arg(&args) {
        (Some(code), _) => code.to_string(),
        (None, _) => return Err(Event360Error::InvalidInput("Usage: /verify <code>".to_string())),
    };

    let result = services
        .session_service
        .call(chat_id.0, |api, _| async move { api.tickets().verify(&code).await })
        .await?;
    bot.send_message(chat_id, views::verification(&result)).await?;
    Ok(())
}

/// First argument as a numeric id
pub(crate) fn parse_id(args: &str, usage: &str) -> Result<i64> {
    split_first_arg(args)
        .0
        .and_then(|id| id.trim_start_matches('#').parse().ok())
        .ok_or_else(|| Event360Error::InvalidInput(format!("Usage: {}", usage)))
}
