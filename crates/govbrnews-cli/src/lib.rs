//! Command-line front end of the GovBRNews MCP server.
//!
//! - [`cli`]: clap argument types
//! - [`config`]: [`GovBrNewsConfig`] loading (file, environment, defaults)
//! - [`config_handlers`]: `govbrnews config ...` subcommands
//! - [`app`]: logging setup and command dispatch

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;

pub use app::{GovBrNewsCli, connect};
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::GovBrNewsConfig;
