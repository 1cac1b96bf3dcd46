use std::{net::SocketAddr, path::Path as FsPath, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{
    answer_chat, blog_detail, list_blogs, list_projects, ApiContext, RetrievalAssistant,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{BlogDetail, BlogSummary, ChatRequest, ChatResponse, ProjectSummary},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

mod config;

use config::{load_settings, prepare_database_url};

const MAX_CHAT_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if let Some(seed_dir) = settings.seed_dir.as_deref() {
        let seed_dir = FsPath::new(seed_dir);
        if seed_dir.is_dir() {
            storage.seed_from_dir(seed_dir).await?;
        } else {
            info!(seed_dir = %seed_dir.display(), "seed directory not found, starting empty");
        }
    }

    let api = ApiContext::new(storage, Arc::new(RetrievalAssistant::new()));
    let state = AppState { api };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/projects", get(http_list_projects))
        .route("/api/blogs", get(http_list_blogs))
        .route("/api/blogs/:slug", get(http_blog_detail))
        .route("/api/chat", post(http_chat))
        .layer(RequestBodyLimitLayer::new(MAX_CHAT_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectSummary>>, (StatusCode, Json<ApiError>)> {
    list_projects(&state.api).await.map(Json).map_err(reject)
}

async fn http_list_blogs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BlogSummary>>, (StatusCode, Json<ApiError>)> {
    list_blogs(&state.api).await.map(Json).map_err(reject)
}

async fn http_blog_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogDetail>, (StatusCode, Json<ApiError>)> {
    blog_detail(&state.api, &slug).await.map(Json).map_err(reject)
}

async fn http_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ApiError>)> {
    answer_chat(&state.api, &req.message)
        .await
        .map(Json)
        .map_err(reject)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
