//! # imagebot-cli
//!
//! Argument parsing, config loading, handler wiring and the HTTP webhook server behind the `imagebot` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod generate;
pub mod server;

pub use app::build_chain;
pub use cli::{Cli, Commands};
pub use config::AppConfig;
