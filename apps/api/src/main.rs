mod auth;
mod bookings;
mod campaigns;
mod clients;
mod companies;
mod config;
mod db;
mod email_accounts;
mod errors;
mod leadlists;
mod models;
mod people;
mod replies;
mod routes;
mod state;
mod workspaces;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clients::emailbison::BisonClient;
use crate::clients::hq::HqClient;
use crate::clients::modal::ModalClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ops.zone API v{}", env!("CARGO_PKG_VERSION"));
    info!("{} operator account(s) provisioned", config.operators.len());

    // Initialize PostgreSQL and run migrations
    let db = create_pool(&config.database_url).await?;

    // Upstream clients
    let bison = BisonClient::new(&config.emailbison_base_url, &config.emailbison_api_key);
    let hq = HqClient::new(&config.hq_base_url, &config.hq_api_key);
    let modal = ModalClient::new(&config.modal_base_url, &config.modal_api_key);
    info!("Upstream clients initialized (EmailBison, HQ, Modal)");

    // Build app state
    let state = AppState {
        db,
        bison,
        hq,
        modal,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
