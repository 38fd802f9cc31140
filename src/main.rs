// src/main.rs

use dotenvy::dotenv;
use std::sync::Arc;
use study_compass::app::AppContext;
use study_compass::config::Config;
use study_compass::identity::StaticIdentityProvider;
use study_compass::pages::landing;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    // Only the file layer is attached: stdout belongs to the interactive pages.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    let provider = Arc::new(StaticIdentityProvider::from_env());
    let ctx = match AppContext::new(config, provider) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Initializing against {}", ctx.config.api_base_url);
    if let Err(e) = ctx.initialize().await {
        eprintln!("{}", e.message());
        std::process::exit(1);
    }

    if let Err(e) = landing::run(&ctx).await {
        tracing::error!("Fatal page error: {}", e);
        eprintln!("{}", e.message());
        std::process::exit(1);
    }
}
