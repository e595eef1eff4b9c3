use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crop_core::Result;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = config.cors_layer()?;

    Ok(Router::new()
        .route("/labels", get(handlers::list_labels))
        .route("/data", get(handlers::get_data))
        .route("/notebook", get(handlers::get_notebook))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state)))
}

pub async fn serve(config: ServerConfig, state: AppState) -> Result<()> {
    let app = create_app(state, &config)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    info!("🔓 Allowed origins: {}", config.allowed_origins.join(", "));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

pub mod prelude {
    pub use crop_core::{Crop, Error, Result};
    pub use crate::{create_app, serve, AppState, ServerConfig};
}
