use crate::config::{Config, UpdatePolicy};
use crate::feed::{FeedSource, ObjectStorageFeed};
use crate::import::Importer;
use crate::store::{CatalogStore, RecordStoreClient};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const PORT: u16 = 3152;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn FeedSource>,
    pub store: Arc<dyn CatalogStore>,
    pub policy: UpdatePolicy,
    pub api_key: String,
}

pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    let feed: Arc<dyn FeedSource> = Arc::new(ObjectStorageFeed::new(&config));
    let store: Arc<dyn CatalogStore> = Arc::new(RecordStoreClient::new(&config));

    let state = AppState {
        feed,
        store,
        policy: config.update_policy,
        api_key: config.api_key,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/import", post(handle_import))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Runs the full reconciliation pass. The trigger carries no payload; it is
/// fired by a scheduler or an upload-completion hook.
async fn handle_import(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> impl IntoResponse {
    let authorized = auth
        .as_ref()
        .map(|TypedHeader(Authorization(bearer))| bearer.token() == state.api_key)
        .unwrap_or(false);
    if !authorized {
        warn!("Import trigger rejected: invalid or missing API key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "Invalid or missing API key"})),
        );
    }

    let importer = Importer::new(state.feed.clone(), state.store.clone(), state.policy);
    match importer.run().await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({"status": "success", "summary": summary})),
        ),
        Err(e) => {
            error!("Import failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": format!("Import failed: {:#}", e)})),
            )
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
