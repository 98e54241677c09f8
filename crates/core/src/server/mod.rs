//! WebSocket server exposing the prompt commands over JSON-RPC
//!
//! The server binds the configured address, writes a lockfile with the
//! port and auth token so local clients can find it, and accepts
//! connections authenticated by that token.

mod connection;
mod hub;
mod ws_server;

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

pub use hub::{ClientId, Hub};
use tokio::{net::TcpListener, sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    actions::PromptActions,
    config::Config,
    errors::Result,
    lockfile,
};
use connection::ConnectionContext;

/// Length of the generated auth token
pub const TOKEN_LENGTH: usize = 32;

/// Server handle for lifecycle management
pub struct ServerHandle {
    shutdown:      watch::Sender<bool>,
    join_handle:   Option<JoinHandle<()>>,
    lockfile_path: PathBuf,
    hub:           Hub,
    local_addr:    SocketAddr,
    token:         String,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn lockfile_path(&self) -> &Path {
        &self.lockfile_path
    }

    /// Get the Hub instance
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    pub fn is_running(&self) -> bool {
        !*self.shutdown.borrow()
    }

    /// Stop the server, wait for the accept loop and remove the lockfile
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);

        if let Some(handle) = self.join_handle.take() {
            let _ = handle.await;
        }

        if let Err(e) = lockfile::remove_lockfile(&self.lockfile_path) {
            warn!("failed to remove lockfile: {}", e);
        }
        info!(addr = %self.local_addr, "server stopped");
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.join_handle.take() {
            handle.abort();
        }
        let _ = lockfile::remove_lockfile(&self.lockfile_path);
    }
}

/// Start the WebSocket server
pub async fn start(config: &Config, actions: PromptActions) -> Result<ServerHandle> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let port = local_addr.port();

    // Generate token and write lockfile
    let token = lockfile::generate_token(TOKEN_LENGTH);
    let lockfile_path = lockfile::write_lockfile(&config.lockfile_dir, port, &token)?;

    let hub = Hub::new();
    let (shutdown, shutdown_rx) = watch::channel(false);

    let ctx = ConnectionContext {
        actions,
        hub: hub.clone(),
        token: token.clone(),
        shutdown: shutdown_rx,
    };
    let join_handle = tokio::spawn(ws_server::run_accept_loop(listener, ctx));

    info!(addr = %local_addr, lockfile = %lockfile_path.display(), "server started");

    Ok(ServerHandle {
        shutdown,
        join_handle: Some(join_handle),
        lockfile_path,
        hub,
        local_addr,
        token,
    })
}
