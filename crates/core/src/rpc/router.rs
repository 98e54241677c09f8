//! JSON-RPC message routing
//!
//! Parses incoming text frames and routes every method to the command
//! registry. Mutating commands report the change they made so the server
//! can tell other clients to refresh.

use serde_json::Value;
use tracing::warn;

use super::{Id, Notification, Request, Response, JSONRPC_VERSION};
use crate::{
    actions::PromptActions,
    commands,
    errors::{PromptError, Result},
    notifications::PromptChange,
};

/// Outcome of handling one text frame
#[derive(Debug, Default)]
pub struct Dispatched {
    /// Serialized response; `None` for notifications
    pub response: Option<String>,
    /// Prompt mutation caused by the call, if it succeeded
    pub change:   Option<PromptChange>,
}

/// Parse and route incoming text message
///
/// Returns a response for requests and none for notifications, whether or
/// not the notified command succeeded. Frames that are not JSON or not
/// JSON-RPC 2.0 are errors; the caller answers them with a null-id error
/// response.
pub async fn handle_text(actions: &PromptActions, text: &str) -> Result<Dispatched> {
    let value: Value = serde_json::from_str(text).map_err(PromptError::SerdeError)?;

    if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(PromptError::Other(
            "Unknown message format - expected a JSON-RPC 2.0 object".into(),
        ));
    }

    if value.get("id").is_some() {
        let request: Request = serde_json::from_value(value)?;
        let (response, change) = handle_request(actions, request).await;
        Ok(Dispatched {
            response: Some(serde_json::to_string(&response)?),
            change,
        })
    } else {
        let notification: Notification = serde_json::from_value(value)?;
        let change = handle_notification(actions, notification).await;
        Ok(Dispatched {
            response: None,
            change,
        })
    }
}

/// Route a JSON-RPC request to the command registry
pub async fn handle_request(
    actions: &PromptActions,
    req: Request,
) -> (Response, Option<PromptChange>) {
    match commands::dispatch(actions, &req.method, req.params).await {
        Ok(value) => {
            let change = PromptChange::from_command(&req.method, &value);
            (Response::success(req.id, value), change)
        },
        Err(err) => (Response::failure(req.id, &err), None),
    }
}

/// Handle a JSON-RPC notification
///
/// Runs the command but never produces a response, not even for a failure;
/// failures are only logged.
pub async fn handle_notification(
    actions: &PromptActions,
    notif: Notification,
) -> Option<PromptChange> {
    match commands::dispatch(actions, &notif.method, notif.params).await {
        Ok(value) => PromptChange::from_command(&notif.method, &value),
        Err(err) => {
            warn!(
                method = %notif.method,
                category = err.category(),
                "notification failed: {}",
                err
            );
            None
        },
    }
}

/// Error response for a frame that could not be routed
pub fn unroutable(err: &PromptError) -> String {
    let response = Response::failure(Id::Null, err);
    // A Response with a null id and plain strings always serializes
    serde_json::to_string(&response).unwrap_or_default()
}
