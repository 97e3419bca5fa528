//! Webhook entry point.
//!
//! Accepts a serverless-style event `{"body": "<update json>"}` and answers `{"statusCode", "body"}`,
//! where `body` is itself a JSON-encoded string. A missing body is a 400; a body that is not a
//! Telegram update, or a dispatch failure, is a 500.

use handler_chain::HandlerChain;
use imagebot_core::{HandlerResponse, ImagebotError, Result, ToCoreIncoming};
use serde::{Deserialize, Serialize};
use teloxide::types::Update;
use tracing::{debug, error, info, instrument};

use crate::adapters::TelegramUpdateWrapper;

pub const BAD_REQUEST_BODY: &str = "Bad Request: Not a Telegram Update";

/// Incoming event. Fields other than `body` are accepted and ignored; a `null` body counts as missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl WebhookResponse {
    fn new(status_code: u16, message: &str) -> Self {
        // A plain string always serializes.
        let body = serde_json::to_string(message).unwrap_or_else(|_| format!("\"{}\"", message));
        Self { status_code, body }
    }

    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    pub fn bad_request() -> Self {
        Self::new(400, BAD_REQUEST_BODY)
    }

    pub fn error(message: &str) -> Self {
        Self::new(500, &format!("Error: {}", message))
    }
}

/// Handles one event end to end. Never fails; every outcome is a response.
#[instrument(skip(chain, event), fields(has_body = event.body.is_some()))]
pub async fn handle_event(chain: &HandlerChain, event: &WebhookEvent) -> WebhookResponse {
    let Some(body) = event.body.as_deref() else {
        info!("Event has no body");
        return WebhookResponse::bad_request();
    };

    match process_update(chain, body).await {
        Ok(()) => WebhookResponse::ok(),
        Err(e) => {
            error!(error = %e, "Failed to process update");
            WebhookResponse::error(&e.to_string())
        }
    }
}

/// Parses a raw update body and dispatches it.
pub async fn process_update(chain: &HandlerChain, body: &str) -> Result<()> {
    let update: Update = serde_json::from_str(body)
        .map_err(|e| ImagebotError::Update(format!("not a Telegram update: {}", e)))?;
    dispatch_update(chain, &update).await?;
    Ok(())
}

/// Runs the chain for updates the bot understands. Returns whether a handler claimed the update.
pub async fn dispatch_update(chain: &HandlerChain, update: &Update) -> Result<bool> {
    let Some(incoming) = TelegramUpdateWrapper(update).to_core() else {
        debug!(update_id = update.id.0, "Ignoring update kind");
        return Ok(false);
    };
    info!(
        update_id = update.id.0,
        kind = incoming.kind(),
        user_id = incoming.user().id,
        "Received update"
    );
    let response = chain.handle(&incoming).await?;
    Ok(response == HandlerResponse::Stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagebot_core::{Handler, Message};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        texts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Handler for Recorder {
        async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
            self.texts.lock().unwrap().push(message.content.clone());
            Ok(HandlerResponse::Stop)
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl Handler for Failing {
        async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
            Err(ImagebotError::Bot("telegram unreachable".into()))
        }
    }

    const UPDATE: &str = r#"{
        "update_id": 123456789,
        "message": {
            "message_id": 1,
            "from": {"id": 123456789, "is_bot": false, "first_name": "Test", "username": "test_user"},
            "chat": {"id": 123456789, "first_name": "Test", "username": "test_user", "type": "private"},
            "date": 1631234567,
            "text": "Hello, bot!"
        }
    }"#;

    fn event(body: Option<&str>) -> WebhookEvent {
        WebhookEvent {
            body: body.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_valid_update_returns_ok_and_dispatches() {
        let recorder = Arc::new(Recorder::default());
        let chain = HandlerChain::new().add_handler(recorder.clone());

        let response = handle_event(&chain, &event(Some(UPDATE))).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(serde_json::from_str::<String>(&response.body).unwrap(), "OK");
        assert_eq!(*recorder.texts.lock().unwrap(), vec!["Hello, bot!".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_body_is_bad_request() {
        let chain = HandlerChain::new();
        let parsed: WebhookEvent = serde_json::from_str("{}").unwrap();

        let response = handle_event(&chain, &parsed).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(
            serde_json::from_str::<String>(&response.body).unwrap(),
            BAD_REQUEST_BODY
        );
    }

    #[tokio::test]
    async fn test_null_body_is_bad_request() {
        let chain = HandlerChain::new();
        let parsed: WebhookEvent = serde_json::from_str(r#"{"body": null}"#).unwrap();

        let response = handle_event(&chain, &parsed).await;

        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_malformed_body_is_server_error() {
        let chain = HandlerChain::new();

        let response = handle_event(&chain, &event(Some("{not json"))).await;

        assert_eq!(response.status_code, 500);
        let body = serde_json::from_str::<String>(&response.body).unwrap();
        assert!(body.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_server_error() {
        let chain = HandlerChain::new().add_handler(Arc::new(Failing));

        let response = handle_event(&chain, &event(Some(UPDATE))).await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("telegram unreachable"));
    }

    #[tokio::test]
    async fn test_unhandled_update_kind_is_ok() {
        let recorder = Arc::new(Recorder::default());
        let chain = HandlerChain::new().add_handler(recorder.clone());
        let body = r#"{"update_id": 5, "poll_answer": {"poll_id": "p", "user": {"id": 1, "is_bot": false, "first_name": "A"}, "option_ids": [0]}}"#;

        let response = handle_event(&chain, &event(Some(body))).await;

        assert_eq!(response.status_code, 200);
        assert!(recorder.texts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_response_serializes_status_code_field() {
        let json = serde_json::to_value(WebhookResponse::ok()).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "\"OK\"");
    }
}
