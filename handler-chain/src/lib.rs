//! # Handler chain
//!
//! Dispatches each incoming update to handlers in order. Messages go to [`Handler::handle`], inline
//! keyboard presses to [`Handler::handle_callback`]; the first handler that returns Stop ends the chain.

use imagebot_core::{Handler, HandlerResponse, Incoming, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop ends the chain).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs handlers until one returns Stop. Returns Stop if some handler claimed the update, otherwise Continue.
    #[instrument(skip(self, incoming), fields(kind = incoming.kind(), user_id = incoming.user().id))]
    pub async fn handle(&self, incoming: &Incoming) -> Result<HandlerResponse> {
        info!("step: handler_chain started");

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            debug!(handler = %handler_name, "step: handler processing");

            let response = match incoming {
                Incoming::Message(message) => handler.handle(message).await?,
                Incoming::Callback(query) => handler.handle_callback(query).await?,
            };

            if response == HandlerResponse::Stop {
                info!(handler = %handler_name, "step: handler chain stopped by handler");
                return Ok(HandlerResponse::Stop);
            }
        }

        info!("step: handler_chain finished without a handler claiming the update");
        Ok(HandlerResponse::Continue)
    }
}
