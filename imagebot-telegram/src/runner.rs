//! Long-polling runner for local use: every update goes through the same dispatch path as the webhook.

use anyhow::Result;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use crate::webhook::dispatch_update;

/// Polls Telegram for updates until interrupted (Ctrl-C).
#[instrument(skip(bot, handler_chain))]
pub async fn run_polling(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Starting long polling"),
        Err(e) => error!(error = %e, "get_me failed; starting long polling anyway"),
    }

    let handler = dptree::endpoint(|update: Update, chain: HandlerChain| async move {
        if let Err(e) = dispatch_update(&chain, &update).await {
            error!(error = %e, update_id = update.id.0, "Handler chain failed");
        }
        respond(())
    });

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Long polling stopped");
    Ok(())
}
