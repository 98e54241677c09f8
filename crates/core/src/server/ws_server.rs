//! WebSocket server accept loop (async with Tokio)

use tokio::{net::TcpListener, sync::watch};
use tracing::{debug, warn};

use super::connection::{self, ConnectionContext};

/// Run the async accept loop
///
/// Listens for incoming connections and spawns async tasks to handle them.
/// Returns once the shutdown flag flips (or its sender is dropped).
pub async fn run_accept_loop(listener: TcpListener, ctx: ConnectionContext) {
    let mut shutdown: watch::Receiver<bool> = ctx.shutdown.clone();

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }

            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    debug!(%addr, "accepted connection");
                    tokio::spawn(connection::handle_connection(stream, ctx.clone()));
                }
                Err(e) => {
                    // Accept errors are per-connection; keep listening
                    warn!("accept failed: {}", e);
                }
            },
        }
    }
}
