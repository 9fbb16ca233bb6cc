use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use provider_report::api::server;
use provider_report::{config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Arc::new(config::Config::from_env());

    if let Some(dir) = config.database_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Cannot create data directory {}: {e}", dir.display());
            std::process::exit(1);
        }
    }

    // Open once at startup so migrations run (and failures surface)
    // before the listener comes up. Request handlers open their own
    // connections through the shared context.
    match db::open_database(&config.database_path) {
        Ok(_) => tracing::info!("Database ready at {}", config.database_path.display()),
        Err(e) => {
            tracing::error!("Database initialization failed: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = server::serve(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
