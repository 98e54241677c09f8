//! Async WebSocket connection handling with tokio-tungstenite

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use http::StatusCode;
use subtle::ConstantTimeEq;
use tokio::net::TcpStream;
use tokio::sync::{mpsc::{self, UnboundedReceiver}, watch};
use tokio::time::{interval, Instant};
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{ErrorResponse, Request, Response},
        Error as WsError, Message,
    },
    WebSocketStream,
};
use tracing::{debug, info, warn};

use super::hub::{ClientId, Hub};
use crate::{
    actions::PromptActions,
    notifications,
    rpc::router,
};

const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything a connection task needs from the server
#[derive(Clone)]
pub struct ConnectionContext {
    pub actions:  PromptActions,
    pub hub:      Hub,
    pub token:    String,
    pub shutdown: watch::Receiver<bool>,
}

/// Handle a single WebSocket connection asynchronously
pub async fn handle_connection(stream: TcpStream, ctx: ConnectionContext) {
    let client_id = Hub::next_client_id();

    match accept_with_auth(stream, &ctx.token).await {
        Ok(websocket) => {
            let (tx, rx) = mpsc::unbounded_channel();
            ctx.hub.register(client_id, tx);
            info!(client_id, clients = ctx.hub.client_count(), "client connected");

            let reason = match run_message_loop(websocket, rx, client_id, &ctx).await {
                Ok(reason) => reason,
                Err(e) => e.to_string(),
            };

            ctx.hub.unregister(client_id);
            info!(client_id, %reason, "client disconnected");
        },
        Err(e) => {
            debug!(client_id, "handshake failed: {}", e);
        },
    }
}

/// Run the async WebSocket message loop
async fn run_message_loop(
    websocket: WebSocketStream<TcpStream>,
    mut outbound_rx: UnboundedReceiver<String>,
    client_id: ClientId,
    ctx: &ConnectionContext,
) -> Result<String, WsError> {
    let (mut write, mut read) = websocket.split();
    let mut shutdown = ctx.shutdown.clone();

    let mut ping_interval = interval(PING_INTERVAL);
    let mut last_pong = Instant::now();

    loop {
        if *shutdown.borrow() {
            let _ = write.close().await;
            return Ok("server shutdown".to_string());
        }

        if last_pong.elapsed() >= PONG_TIMEOUT {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    let _ = write.close().await;
                    return Ok("server dropped".to_string());
                }
            }

            _ = ping_interval.tick() => {
                write.send(Message::Ping(Vec::<u8>::new().into())).await?;
            }

            Some(msg) = outbound_rx.recv() => {
                write.send(Message::Text(msg.into())).await?;
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(text.as_str(), client_id, ctx).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        last_pong = Instant::now();
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let _ = write.send(Message::Close(frame)).await;
                        return Ok("closed by client".to_string());
                    }
                    Some(Err(e)) => return Err(e),
                    None => break,
                    _ => {}
                }
            }
        }
    }

    let _ = write.close().await;
    Ok("normal closure".to_string())
}

/// Route one JSON-RPC frame and queue the reply on this client's channel
///
/// Replies go through the hub so they stay ordered with broadcasts.
async fn handle_text_message(text: &str, client_id: ClientId, ctx: &ConnectionContext) {
    let dispatched = match router::handle_text(&ctx.actions, text).await {
        Ok(dispatched) => dispatched,
        Err(e) => {
            warn!(client_id, category = e.category(), "unroutable frame: {}", e);
            let _ = ctx.hub.send_to_client(client_id, &router::unroutable(&e));
            return;
        },
    };

    if let Some(response) = dispatched.response {
        if let Err(e) = ctx.hub.send_to_client(client_id, &response) {
            warn!(client_id, "failed to queue response: {}", e);
        }
    }

    if let Some(change) = dispatched.change {
        if let Err(e) = notifications::send_prompts_changed(&ctx.hub, &change) {
            warn!("failed to broadcast prompt change: {}", e);
        }
    }
}

/// Compare a presented auth token against the server's in constant time
///
/// Only the length check short-circuits; the token length is public.
fn token_matches(presented: &str, expected: &str) -> bool {
    presented.len() == expected.len()
        && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

/// Pull the `auth` query parameter out of a request URI query string
fn auth_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "auth")
        .map(|(_, value)| value.into_owned())
}

fn reject(status: StatusCode, body: &str) -> ErrorResponse {
    let mut response = ErrorResponse::new(Some(body.to_string()));
    *response.status_mut() = status;
    response
}

/// Accept WebSocket with authentication
///
/// The token travels as the `auth` query parameter.
async fn accept_with_auth(
    stream: TcpStream,
    expected_token: &str,
) -> Result<WebSocketStream<TcpStream>, WsError> {
    let expected = expected_token.to_string();

    let callback = move |req: &Request, response: Response| {
        match req.uri().query().and_then(auth_param) {
            Some(token) if token_matches(&token, &expected) => Ok(response),
            _ => Err(reject(StatusCode::UNAUTHORIZED, "Unauthorized")),
        }
    };

    accept_hdr_async(stream, callback).await
}
