use crate::config::AppConfig;
use crate::scene::MapScene;
use anyhow::Result;
use axum::{extract::State, response::Json, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub struct AppState {
    pub scene: MapScene,
    pub config: AppConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    let tile_service = ServeDir::new(&state.config.output.tile_dir);
    let static_service = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .route("/api/scene", get(scene_handler))
        .nest_service("/tiles", tile_service)
        .fallback_service(static_service)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, scene: MapScene) -> Result<()> {
    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let state = Arc::new(AppState { scene, config });
    let app = router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn scene_handler(State(state): State<Arc<AppState>>) -> Json<MapScene> {
    Json(state.scene.clone())
}
