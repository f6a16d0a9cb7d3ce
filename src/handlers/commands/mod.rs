//! Command handlers module
//!
//! One handler per page of the storefront. Failures are reported inline and
//! never abort the dispatcher.

pub mod account;
pub mod admin;
pub mod events;
pub mod help;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use tracing::debug;
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::{ScenarioManager, StateStorage};
use super::report_error;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Event360 commands:")]
pub enum Command {
    #[command(description = "Home page with upcoming events")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Browse events, optionally with a search term")]
    Events(String),
    #[command(description = "Show an event: /event <id>")]
    Event(String),
    #[command(description = "Sign in")]
    Login,
    #[command(description = "Create an account")]
    Register,
    #[command(description = "Sign out")]
    Logout,
    #[command(description = "Your profile")]
    Me,
    #[command(description = "Your dashboard")]
    Dashboard,
    #[command(description = "Your tickets")]
    Tickets,
    #[command(description = "Your orders")]
    Orders,
    #[command(description = "Buy tickets: /buy <ticket type id> [quantity]")]
    Buy(String),
    #[command(description = "Submit an event (organizers)")]
    CreateEvent,
    #[command(description = "Events you organize (organizers)")]
    MyEvents,
    #[command(description = "Check a ticket in: /checkin <ticket id> (organizers)")]
    CheckIn(String),
    #[command(description = "Verify a ticket code: /verify <code> (organizers)")]
    Verify(String),
    #[command(description = "Your saved events")]
    Wishlist,
    #[command(description = "Your notifications")]
    Notifications,
    #[command(description = "Change your password")]
    Password,
    #[command(description = "Admin panel (admins)")]
    Admin,
    #[command(description = "Platform statistics (admins)")]
    Stats,
    #[command(description = "Abandon the current form")]
    Cancel,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, command = ?cmd, "Processing command");

    // a new command abandons an interruptible form
    if cmd != Command::Cancel {
        start::interrupt_form(chat_id, &scenario_manager, &state_storage).await?;
    }

    let result = match cmd {
        Command::Start => start::handle_start(bot.clone(), msg, services).await,
        Command::Help => help::handle_help(bot.clone(), msg, services).await,
        Command::Events(query) => events::handle_events_list(bot.clone(), msg, services, state_storage, query).await,
        Command::Event(id) => events::handle_event(bot.clone(), msg, services, id).await,
        Command::Login => start::handle_login(bot.clone(), msg, services, scenario_manager, state_storage).await,
        Command::Register => start::handle_register(bot.clone(), msg, services, scenario_manager, state_storage).await,
        Command::Logout => start::handle_logout(bot.clone(), msg, services).await,
        Command::Me => account::handle_profile(bot.clone(), msg, services).await,
        Command::Dashboard => account::handle_dashboard(bot.clone(), msg, services).await,
        Command::Tickets => account::handle_tickets(bot.clone(), msg, services).await,
        Command::Orders => account::handle_orders(bot.clone(), msg, services).await,
        Command::Buy(args) => account::handle_buy(bot.clone(), msg, services, args).await,
        Command::CreateEvent => events::handle_create_event(bot.clone(), msg, services, scenario_manager, state_storage).await,
        Command::MyEvents => events::handle_my_events(bot.clone(), msg, services).await,
        Command::CheckIn(args) => events::handle_check_in(bot.clone(), msg, services, args).await,
        Command::Verify(args) => events::handle_verify(bot.clone(), msg, services, args).await,
        Command::Wishlist => account::handle_wishlist(bot.clone(), msg, services).await,
        Command::Notifications => account::handle_notifications(bot.clone(), msg, services).await,
        Command::Password => account::handle_password(bot.clone(), msg, services, scenario_manager, state_storage).await,
        Command::Admin => admin::handle_admin_panel(bot.clone(), msg, services).await,
        Command::Stats => admin::handle_stats(bot.clone(), msg, services).await,
        Command::Cancel => start::handle_cancel(bot.clone(), msg, state_storage).await,
    };

    match result {
        Err(e) if !matches!(e, crate::utils::errors::Event360Error::Telegram(_)) => report_error(&bot, chat_id, &e).await,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start", "event360_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/events jazz night", "event360_bot").unwrap(),
            Command::Events("jazz night".to_string())
        );
        assert_eq!(Command::parse("/createevent", "event360_bot").unwrap(), Command::CreateEvent);
        assert_eq!(Command::parse("/buy 12 2", "event360_bot").unwrap(), Command::Buy("12 2".to_string()));
        assert_eq!(Command::parse("/checkin 5", "event360_bot").unwrap(), Command::CheckIn("5".to_string()));
    }
}
