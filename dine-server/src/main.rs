use anyhow::Context;
use dine_server::{Config, Server, ServerState, api, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env) and logging
    let _ = dotenv::dotenv();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|v| !v.trim().is_empty());
    let log_json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let _log_guard = init_logger_with_file(log_json, log_dir.as_deref())
        .context("failed to initialize logging")?;

    api::health::mark_started();
    print_banner();

    // 2. Configuration
    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(environment = %config.environment, "Dine server starting...");

    // 3. State (database, notifier, bootstrap account)
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 4. HTTP server
    Server::with_state(config, state)
        .run()
        .await
        .context("server error")?;

    Ok(())
}
