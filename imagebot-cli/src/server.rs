//! HTTP front for the webhook.
//!
//! `POST /webhook` takes a raw Telegram update (what Telegram's setWebhook delivers), `POST /event`
//! takes the wrapped `{"body": ...}` event, `GET /health` answers "OK".

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use handler_chain::HandlerChain;
use imagebot_telegram::{handle_event, WebhookEvent, WebhookResponse};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub chain: HandlerChain,
}

pub fn create_router(chain: HandlerChain) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", post(webhook))
        .route("/event", post(event))
        .with_state(AppState { chain })
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until the process stops.
pub async fn serve(addr: &str, chain: HandlerChain) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Webhook server listening");
    axum::serve(listener, create_router(chain)).await?;
    Ok(())
}

fn into_http(response: WebhookResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn webhook(State(state): State<AppState>, body: String) -> Response {
    let event = WebhookEvent { body: Some(body) };
    into_http(handle_event(&state.chain, &event).await)
}

async fn event(State(state): State<AppState>, Json(event): Json<WebhookEvent>) -> Response {
    into_http(handle_event(&state.chain, &event).await)
}
