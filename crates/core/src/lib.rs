//! prompt-manager: a small CRUD manager for named prompt templates
//!
//! Prompts (name, description, content) live in a SQLite table. On top of
//! the store sit:
//! - Server actions that validate input and map store results to typed
//!   errors (`actions`)
//! - A list view with create/update/delete dialogs and a loading
//!   placeholder (`ui`)
//! - A JSON-RPC command surface served over an authenticated WebSocket,
//!   broadcasting `prompts/changed` after each mutation (`commands`,
//!   `rpc`, `server`)
//!
//! ## Architecture
//!
//! - **Store**: `db::PromptStore` trait, SQLite and in-memory backends
//! - **Actions**: `actions::PromptActions`, the only path to the store
//! - **View**: `ui::ListView` drives `ui::Dialog` state machines
//! - **Transport**: `server::start` writes a lockfile with port and token

// Module declarations
pub mod actions;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod lockfile;
pub mod logging;
pub mod notifications;
pub mod rpc;
pub mod server;
pub mod ui;

pub use actions::PromptActions;
pub use config::Config;
pub use errors::{PromptError, Result};
