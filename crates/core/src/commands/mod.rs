//! Named commands reachable from RPC clients
//!
//! Every prompt operation is exposed under a dotted name (`prompts.list`,
//! `prompts.create`, ...) and resolved through one static table. Handlers
//! borrow the shared `PromptActions` and return a boxed future so the table
//! can hold plain function pointers.
//!
//! New handlers have the shape
//! `fn(&PromptActions, Value) -> BoxFuture<'_, Result<Value>>` and get an
//! entry in `REGISTRY`.

pub mod prompts;

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{
    actions::PromptActions,
    errors::{PromptError, Result},
};

/// Handler signature shared by every registered command
pub type CommandHandler = for<'a> fn(&'a PromptActions, Value) -> BoxFuture<'a, Result<Value>>;

static REGISTRY: Lazy<HashMap<&'static str, CommandHandler>> = Lazy::new(|| {
    let handlers: [(&'static str, CommandHandler); 5] = [
        ("ping", ping),
        (prompts::LIST, prompts::list),
        (prompts::CREATE, prompts::create),
        (prompts::UPDATE, prompts::update),
        (prompts::DELETE, prompts::delete),
    ];
    handlers.into_iter().collect()
});

/// Run the handler registered under `command`
pub async fn dispatch(actions: &PromptActions, command: &str, args: Value) -> Result<Value> {
    let handler = REGISTRY
        .get(command)
        .ok_or_else(|| PromptError::CommandNotFound(command.to_string()))?;
    handler(actions, args).await
}

/// Registered command names, sorted
pub fn list_commands() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.keys().map(|name| name.to_string()).collect();
    names.sort();
    names
}

/// Liveness check: echoes an object argument back with `"pong": true` and
/// the names a client may call
fn ping(_actions: &PromptActions, args: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let mut reply = match args {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        reply.insert("pong".into(), Value::Bool(true));
        reply.insert("commands".into(), Value::from(list_commands()));
        Ok(Value::Object(reply))
    })
}
