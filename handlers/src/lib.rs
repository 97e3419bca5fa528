//! # Command handlers
//!
//! The conversational part of the bot: `/start` with its option keyboard, the keyboard callbacks,
//! `/help`, and the plain-text echo that answers anything no other handler claimed.

mod callback;
mod echo;
mod help;
mod start;

#[cfg(test)]
mod test;

pub use callback::{CallbackHandler, OPTION_1, OPTION_2, OPTION_3};
pub use echo::EchoHandler;
pub use help::{HelpHandler, HELP_TEXT};
pub use start::{start_keyboard, StartHandler, GREETING};
