//! Mailer server binary.
//!
//! Loads configuration from the environment, wires the Loops directory,
//! CAPTCHA verifier and token service into the HTTP API, and serves it
//! until Ctrl-C.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mailer::adapters::auth::JwtTokenService;
use mailer::adapters::captcha::verifier_from_config;
use mailer::adapters::http::{build_app, SubscriptionAppState};
use mailer::adapters::loops::{LoopsClient, LoopsContactDirectory};
use mailer::config::{AppConfig, LogFormat, ServerConfig};
use mailer::ports::ContactDirectory;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        public_url = config.server.public_url.as_deref().unwrap_or_default(),
        captcha = config.captcha.provider.as_str(),
        "Starting mailer"
    );

    let company = config.company.identity();
    let loops = LoopsClient::from_config(&config.loops)?;
    let directory = Arc::new(
        LoopsContactDirectory::new(Arc::new(loops), company.clone())
            .with_page_size(config.loops.page_size),
    );

    if let Err(e) = directory.initialize_custom_properties().await {
        tracing::error!(
            error = %e,
            details = ?e.details(),
            "Failed to initialize custom contact properties; subscribe writes now depend on Loops accepting unknown properties such as xOptInStatus"
        );
    }

    let state = SubscriptionAppState {
        directory,
        captcha: verifier_from_config(&config.captcha)?,
        tokens: Arc::new(JwtTokenService::from_config(&config.auth)),
        company,
        captcha_provider: config.captcha.provider,
        captcha_site_key: config.captcha.site_key.clone(),
        public_url: config.server.public_url()?,
    };

    let app = build_app(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
