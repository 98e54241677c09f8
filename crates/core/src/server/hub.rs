//! Connection registry and broadcast support

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedSender;

use crate::errors::{PromptError, Result};

/// Client ID type
pub type ClientId = u64;

/// Global client ID counter
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Message to send to a client
pub type ClientMessage = String;

/// Hub for managing multiple WebSocket connections
#[derive(Clone, Default)]
pub struct Hub {
    clients: Arc<Mutex<HashMap<ClientId, UnboundedSender<ClientMessage>>>>,
}

impl Hub {
    /// Create a new hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a unique client ID
    pub fn next_client_id() -> ClientId {
        NEXT_CLIENT_ID.fetch_add(1, Ordering::SeqCst)
    }

    // A panic while holding the lock leaves a plain map behind; keep using it.
    fn clients(&self) -> MutexGuard<'_, HashMap<ClientId, UnboundedSender<ClientMessage>>> {
        self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new client with its message sender
    pub fn register(&self, id: ClientId, sender: UnboundedSender<ClientMessage>) {
        self.clients().insert(id, sender);
    }

    /// Unregister a client
    pub fn unregister(&self, id: ClientId) {
        self.clients().remove(&id);
    }

    /// Get count of connected clients
    pub fn client_count(&self) -> usize {
        self.clients().len()
    }

    /// Broadcast a message to all connected clients
    ///
    /// If sending fails for any client, that client is skipped (it may have
    /// disconnected).
    pub fn broadcast(&self, message: &str) {
        for sender in self.clients().values() {
            let _ = sender.send(message.to_string());
        }
    }

    /// Send a message to a specific client
    pub fn send_to_client(&self, id: ClientId, message: &str) -> Result<()> {
        let clients = self.clients();

        match clients.get(&id) {
            Some(sender) => sender
                .send(message.to_string())
                .map_err(|_| PromptError::HubError("Failed to send message to client".to_string())),
            None => Err(PromptError::HubError(format!("Client {} not found", id))),
        }
    }
}
