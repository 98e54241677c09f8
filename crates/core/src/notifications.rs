//! Server-initiated notifications to connected clients
//!
//! After a successful create, update or delete every client receives a
//! `prompts/changed` notification so its list view can re-fetch:
//!
//! ```json
//! {"jsonrpc":"2.0","method":"prompts/changed","params":{"action":"deleted","id":3}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    commands::prompts::{CREATE, DELETE, UPDATE},
    db::PromptId,
    errors::{PromptError, Result},
    rpc::Notification,
    server::Hub,
};

pub const PROMPTS_CHANGED: &str = "prompts/changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// A mutation of the stored prompt set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptChange {
    pub action: ChangeAction,
    pub id:     PromptId,
}

impl PromptChange {
    /// Derive the change a successful command produced, if it mutated anything
    pub fn from_command(command: &str, result: &Value) -> Option<Self> {
        let action = match command {
            CREATE => ChangeAction::Created,
            UPDATE => ChangeAction::Updated,
            DELETE => ChangeAction::Deleted,
            _ => return None,
        };
        let id = result.get("id")?.as_i64()?;
        Some(PromptChange { action, id })
    }
}

/// Send prompts/changed notification to all clients
pub fn send_prompts_changed(hub: &Hub, change: &PromptChange) -> Result<()> {
    let notification = Notification::new(PROMPTS_CHANGED, serde_json::to_value(change)?);

    let json = serde_json::to_string(&notification).map_err(|e| {
        PromptError::HubError(format!("Failed to serialize {}: {}", PROMPTS_CHANGED, e))
    })?;
    debug!(?change, clients = hub.client_count(), "broadcasting prompt change");
    hub.broadcast(&json);
    Ok(())
}
