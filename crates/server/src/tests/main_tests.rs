use super::*;
use axum::{body, body::Body, http::Request};
use shared::protocol::{ChatActionKind, ContentFormat, ProjectSummary};
use tower::ServiceExt;

async fn test_app() -> Router {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .upsert_project(&ProjectSummary {
            slug: "spotlight-ai".to_string(),
            name: "Spotlight AI".to_string(),
            short_summary: "Grounded retrieval over portfolio content".to_string(),
            long_summary: None,
            tags: vec!["retrieval".to_string()],
            github_url: None,
            demo_url: None,
            hero_image: None,
            display_order: 0,
            project_type: None,
        })
        .await
        .expect("project");
    storage
        .upsert_blog(&BlogDetail {
            slug: "evaluating-rag".to_string(),
            title: "Evaluating RAG pipelines".to_string(),
            excerpt: "Measuring retrieval quality.".to_string(),
            published_at: None,
            tags: vec!["evaluation".to_string()],
            hero_image: None,
            medium_link: None,
            content_format: ContentFormat::Markdown,
            content: "Precision and recall tell only half the story.".to_string(),
        })
        .await
        .expect("blog");

    let api = ApiContext::new(storage, Arc::new(RetrievalAssistant::new()));
    build_router(Arc::new(AppState { api }))
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn projects_route_lists_seeded_content() {
    let app = test_app().await;
    let request = Request::get("/api/projects")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let projects: Vec<ProjectSummary> = serde_json::from_slice(&body).expect("json");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].slug, "spotlight-ai");
}

#[tokio::test]
async fn blog_detail_route_round_trips_the_post() {
    let app = test_app().await;
    let request = Request::get("/api/blogs/evaluating-rag")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let post: BlogDetail = serde_json::from_slice(&body).expect("json");
    assert_eq!(post.title, "Evaluating RAG pipelines");
}

#[tokio::test]
async fn missing_blog_returns_not_found_envelope() {
    let app = test_app().await;
    let request = Request::get("/api/blogs/missing")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let err: ApiError = serde_json::from_slice(&body).expect("json");
    assert!(matches!(err.code, ErrorCode::NotFound));
}

#[tokio::test]
async fn chat_route_attaches_a_navigate_action_for_section_requests() {
    let app = test_app().await;
    let request = Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "message": "show me the projects page" }).to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let reply: ChatResponse = serde_json::from_slice(&body).expect("json");
    let action = reply.action.expect("action");
    assert_eq!(action.kind, ChatActionKind::Navigate);
    assert_eq!(action.payload, "projects");
}

#[tokio::test]
async fn empty_chat_message_is_rejected_with_bad_request() {
    let app = test_app().await;
    let request = Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "message": "   " }).to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn off_topic_chat_gets_the_refusal_without_an_action() {
    let app = test_app().await;
    let request = Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "message": "write code to scrape a website" }).to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let reply: ChatResponse = serde_json::from_slice(&body).expect("json");
    assert_eq!(reply.response, server_api::OFF_TOPIC_REPLY);
    assert!(reply.action.is_none());
}
