//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: messages and callbacks routed to the right handler method, Stop ending the chain,
//! handlers executed in insertion order, and handler errors propagated to the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use handler_chain::HandlerChain;
use imagebot_core::{
    CallbackQuery, Chat, Handler, HandlerResponse, ImagebotError, Incoming, Message, User,
};

fn test_user() -> User {
    User {
        id: 123,
        username: Some("test_user".to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

fn create_test_message(content: &str) -> Incoming {
    Incoming::Message(Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: test_user(),
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        created_at: Utc::now(),
    })
}

fn create_test_callback(data: &str) -> Incoming {
    Incoming::Callback(CallbackQuery {
        id: "cb1".to_string(),
        user: test_user(),
        chat: None,
        message_id: None,
        data: data.to_string(),
    })
}

/// **Test: a message reaches `handle`, never `handle_callback`.**
#[tokio::test]
async fn test_message_routed_to_handle() {
    let counts = Arc::new(CountingHandler::default());
    let chain = HandlerChain::new().add_handler(counts.clone());

    let result = chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(counts.messages.load(Ordering::SeqCst), 1);
    assert_eq!(counts.callbacks.load(Ordering::SeqCst), 0);
}

/// **Test: a keyboard press reaches `handle_callback`.**
#[tokio::test]
async fn test_callback_routed_to_handle_callback() {
    let counts = Arc::new(CountingHandler::default());
    let chain = HandlerChain::new().add_handler(counts.clone());

    chain.handle(&create_test_callback("option1")).await.unwrap();

    assert_eq!(counts.messages.load(Ordering::SeqCst), 0);
    assert_eq!(counts.callbacks.load(Ordering::SeqCst), 1);
}

/// **Test: Stop ends the chain; later handlers are not run.**
#[tokio::test]
async fn test_handler_stops_chain() {
    struct StopHandler;

    #[async_trait::async_trait]
    impl Handler for StopHandler {
        async fn handle(&self, _message: &Message) -> imagebot_core::Result<HandlerResponse> {
            Ok(HandlerResponse::Stop)
        }
    }

    let counts = Arc::new(CountingHandler::default());
    let chain = HandlerChain::new()
        .add_handler(Arc::new(StopHandler))
        .add_handler(counts.clone());

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(counts.messages.load(Ordering::SeqCst), 0);
}

/// **Test: handlers run in insertion order.**
#[tokio::test]
async fn test_multiple_handlers_executed_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    struct OrderHandler {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl Handler for OrderHandler {
        async fn handle(&self, _message: &Message) -> imagebot_core::Result<HandlerResponse> {
            self.order.lock().unwrap().push(self.name);
            Ok(HandlerResponse::Continue)
        }
    }

    let chain = HandlerChain::new()
        .add_handler(Arc::new(OrderHandler {
            name: "first",
            order: order.clone(),
        }))
        .add_handler(Arc::new(OrderHandler {
            name: "second",
            order: order.clone(),
        }));

    chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

/// **Test: a handler error is returned and stops the chain.**
#[tokio::test]
async fn test_handler_error_propagates() {
    struct FailingHandler;

    #[async_trait::async_trait]
    impl Handler for FailingHandler {
        async fn handle(&self, _message: &Message) -> imagebot_core::Result<HandlerResponse> {
            Err(ImagebotError::Bot("send failed".to_string()))
        }
    }

    let counts = Arc::new(CountingHandler::default());
    let chain = HandlerChain::new()
        .add_handler(Arc::new(FailingHandler))
        .add_handler(counts.clone());

    assert!(chain.handle(&create_test_message("test")).await.is_err());
    assert_eq!(counts.messages.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_chain_continues() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    let result = chain.handle(&create_test_callback("x")).await.unwrap();
    assert_eq!(result, HandlerResponse::Continue);
}

// --- Helpers used by tests ---

#[derive(Default)]
struct CountingHandler {
    messages: AtomicUsize,
    callbacks: AtomicUsize,
}

#[async_trait::async_trait]
impl Handler for CountingHandler {
    async fn handle(&self, _message: &Message) -> imagebot_core::Result<HandlerResponse> {
        self.messages.fetch_add(1, Ordering::SeqCst);
        Ok(HandlerResponse::Continue)
    }

    async fn handle_callback(
        &self,
        _query: &CallbackQuery,
    ) -> imagebot_core::Result<HandlerResponse> {
        self.callbacks.fetch_add(1, Ordering::SeqCst);
        Ok(HandlerResponse::Continue)
    }
}
