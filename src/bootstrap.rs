use std::net::Ipv4Addr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config, db, state::AppState};

pub fn init_tracing() {
    tracing_subscriber::fmt().init();
}

pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Wire up shared state and middleware, bind the listener and serve until the
/// process is stopped. The permissive CORS layer lets the browser storefront
/// call the API from any origin.
pub async fn bootstrap(service_name: &str, app: Router<AppState>) -> Result<()> {
    let config = config::load()?;
    let db_pool = db::init_pool(&config.database.url).await?;
    let state = AppState { db_pool };

    let app = app
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    tracing::info!("{service_name} is listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
