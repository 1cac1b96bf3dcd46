use std::sync::Arc;

use shared::{
    error::ApiError,
    protocol::{BlogDetail, BlogSummary, ChatResponse, ProjectSummary},
};
use storage::Storage;
use tracing::info;

mod assistant;

pub use assistant::{
    is_request_off_topic, ChatAssistant, RetrievalAssistant, NO_MATCH_REPLY, OFF_TOPIC_REPLY,
};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub assistant: Arc<dyn ChatAssistant>,
}

impl ApiContext {
    pub fn new(storage: Storage, assistant: Arc<dyn ChatAssistant>) -> Self {
        Self { storage, assistant }
    }
}

pub async fn list_projects(ctx: &ApiContext) -> Result<Vec<ProjectSummary>, ApiError> {
    ctx.storage.list_projects().await.map_err(internal)
}

pub async fn list_blogs(ctx: &ApiContext) -> Result<Vec<BlogSummary>, ApiError> {
    ctx.storage.list_blogs().await.map_err(internal)
}

pub async fn blog_detail(ctx: &ApiContext, slug: &str) -> Result<BlogDetail, ApiError> {
    ctx.storage
        .blog_by_slug(slug)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found("Blog not found."))
}

/// `/api/chat` behavior: validate, guardrail, then hand the message to the
/// assistant. Navigation payloads ride along as a structured action; the
/// reply text itself is never interpreted by clients.
pub async fn answer_chat(ctx: &ApiContext, message: &str) -> Result<ChatResponse, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::validation("Message must not be empty."));
    }

    if is_request_off_topic(message) {
        info!("chat message rejected by off-topic guardrail");
        return Ok(ChatResponse {
            response: OFF_TOPIC_REPLY.to_string(),
            action: None,
        });
    }

    ctx.assistant
        .reply(&ctx.storage, message)
        .await
        .map_err(internal)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}
