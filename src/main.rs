//! Event360 Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use Event360::{
    config::Settings,
    utils::logging,
    services::ServiceFactory,
    state::{ScenarioManager, StateStorage},
    handlers::{handle_callback_query, handle_command, handle_message, Command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", Event360::info());

    // Initialize state management
    let state_storage = StateStorage::new(settings.storage.clone()).await?;
    if let Err(e) = state_storage.test_connection().await {
        error!(error = %e, "State storage is unreachable");
        return Err(e.into());
    }
    let _cleanup = state_storage.spawn_cleanup(CLEANUP_INTERVAL);
    let scenario_manager = ScenarioManager::new();

    // Initialize services
    info!(api = %settings.api.base_url, "Initializing services...");
    let services = ServiceFactory::new(settings.clone(), state_storage.clone())?;
    let health = services.health_check().await;
    if !health.is_healthy() {
        warn!(issues = ?health.get_issues(), "Starting with degraded services");
    }

    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register the command menu");
    }

    // Wrap services in Arc for dependency injection
    let services_arc = Arc::new(services);
    let scenario_manager_arc = Arc::new(scenario_manager);
    let state_storage_arc = Arc::new(state_storage);

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![
            services_arc,
            scenario_manager_arc,
            state_storage_arc
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Event360 bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("Event360 bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services, scenario_manager, state_storage).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();

    if let Err(e) = handle_message(bot, msg, services, scenario_manager, state_storage).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    let services = (*services).clone();
    let scenario_manager = (*scenario_manager).clone();
    let state_storage = (*state_storage).clone();

    if let Err(e) = handle_callback_query(bot, query, services, scenario_manager, state_storage).await {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
