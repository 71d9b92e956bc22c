//! Doodle server: HTTP front for the sketch-to-3D engine.
//!
//! The scene lives in a single actor task; handlers send it messages and
//! never touch scene state directly.

use std::net::SocketAddr;
use std::sync::Arc;

use doodle_engine::command::history::{InMemoryHistory, JsonFileHistory};
use doodle_engine::scene::SceneState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod actor;
mod ai;
mod config;
mod error;
mod routes;

use actor::{BoxedHistory, SceneActor, SceneHandle};
use ai::AnthropicFallback;
use config::ServerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub scene: SceneHandle,
    pub fallback: Arc<Option<AnthropicFallback>>,
    pub config: Arc<ServerConfig>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "server=info,doodle_engine=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    tracing::info!(
        port = config.port,
        fallback = config.ai_api_key.is_some(),
        model = %config.ai_model,
        timeout_secs = config.ai_timeout.as_secs(),
        "Starting doodle server"
    );

    let scene = match &config.autosave_file {
        Some(path) => SceneState::restore_autosave(path.clone()),
        None => SceneState::new(),
    };
    let history: BoxedHistory = match &config.history_file {
        Some(path) => Box::new(JsonFileHistory::open(path)),
        None => Box::new(InMemoryHistory::default()),
    };

    let state = AppState {
        scene: SceneActor::spawn(scene, history),
        fallback: Arc::new(AnthropicFallback::from_config(&config)),
        config: Arc::new(config.clone()),
    };

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
