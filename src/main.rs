//! Gatehouse server entry point.

use tracing_subscriber::{EnvFilter, fmt};

use gatehouse_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let env = std::env::var("GATEHOUSE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = gatehouse_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = fmt().with_env_filter(filter).with_target(true);
    if config.logging.format == "json" {
        builder.json().with_thread_ids(true).init();
    } else {
        builder.pretty().init();
    }
}
