mod common;

use webhook_chat::config::WidgetConfig;
use webhook_chat::error::FALLBACK_REPLY;
use webhook_chat::message::ChatResponse;
use webhook_chat::routes::create_router;
use webhook_chat::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::spawn_webhook;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(webhook_url: &str) -> Router {
    let state = Arc::new(AppState::new(WidgetConfig::new(webhook_url)));
    create_router("public").with_state(state)
}

fn chat_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn read_chat(response: axum::response::Response) -> ChatResponse {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_chat_endpoint() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"reply":"Hi there!"}"#).await;
    let app = app(&hook.url);

    let response = app
        .oneshot(chat_request(
            r#"{"message": "hello", "session_id": null}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp = read_chat(response).await;
    assert_eq!(chat_resp.reply, "Hi there!");
    assert!(chat_resp.input_enabled);
    assert!(!chat_resp.session_id.is_empty());
    assert!(chat_resp.transcript_html.contains("user-message"));
    assert!(chat_resp.transcript_html.contains("<p>Hi there!</p>"));
    assert!(!chat_resp.transcript_html.contains("typing-indicator"));
}

#[tokio::test]
async fn test_session_is_reused_across_turns() {
    let hook = spawn_webhook(StatusCode::OK, r#"["Noted."]"#).await;
    let app = app(&hook.url);

    let response = app
        .clone()
        .oneshot(chat_request(r#"{"message": "first"}"#.to_string()))
        .await
        .unwrap();
    let first = read_chat(response).await;
    let user_session = hook.last_body().unwrap()["userSession"].clone();
    assert!(user_session.is_string());

    let response = app
        .clone()
        .oneshot(chat_request(format!(
            r#"{{"message": "second", "session_id": "{}"}}"#,
            first.session_id
        )))
        .await
        .unwrap();
    let second = read_chat(response).await;

    assert_eq!(second.session_id, first.session_id);
    assert_eq!(hook.last_body().unwrap()["userSession"], user_session);
    assert_eq!(second.transcript_html.matches("user-message").count(), 2);
    assert_eq!(second.transcript_html.matches("bot-message").count(), 2);

    // The transcript survives a page reload.
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/session/{}/transcript", first.session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(html.to_vec()).unwrap(), second.transcript_html);
}

#[tokio::test]
async fn test_webhook_error_is_collapsed() {
    let hook = spawn_webhook(StatusCode::BAD_GATEWAY, "{}").await;
    let app = app(&hook.url);

    let response = app
        .clone()
        .oneshot(chat_request(r#"{"message": "hello"}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp = read_chat(response).await;
    assert_eq!(chat_resp.reply, FALLBACK_REPLY);
    assert!(chat_resp.input_enabled);
    assert_eq!(chat_resp.transcript_html.matches("bot-message").count(), 1);

    let response = app
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["outcomes"]["status"], 1);
}

#[tokio::test]
async fn test_empty_message_is_rejected_without_dispatch() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"reply":"hi"}"#).await;
    let app = app(&hook.url);

    let response = app
        .oneshot(chat_request(r#"{"message": "   "}"#.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(hook.hits(), 0);
}

#[tokio::test]
async fn test_quick_prompt_by_index() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"reply":"We help with lots."}"#).await;
    let app = app(&hook.url);

    let response = app
        .clone()
        .oneshot(chat_request(r#"{"prompt": 0}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp = read_chat(response).await;
    assert_eq!(chat_resp.reply, "We help with lots.");
    assert_eq!(
        hook.last_body().unwrap()["query"],
        "What can you help me with?"
    );

    let response = app
        .oneshot(chat_request(r#"{"prompt": 99}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(hook.hits(), 1);
}

#[tokio::test]
async fn test_blank_output_reply_is_collapsed() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"output":[""]}"#).await;
    let app = app(&hook.url);

    let response = app
        .oneshot(chat_request(r#"{"message": "hello"}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_chat(response).await.reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_close_tears_session_down() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"reply":"hi"}"#).await;
    let app = app(&hook.url);

    let response = app
        .clone()
        .oneshot(chat_request(r#"{"message": "hello"}"#.to_string()))
        .await
        .unwrap();
    let session_id = read_chat(response).await.session_id;

    let close = |id: &str| {
        Request::builder()
            .method("POST")
            .uri(format!("/session/{id}/close"))
            .body(Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(close(&session_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(close(&session_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/session/{session_id}/transcript"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_page_and_health() {
    let app = app("http://127.0.0.1:9/hook");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"id="chatMessages""#));
    assert!(html.contains("prompt-button"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
