// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket client for the cardsync-remote server.
//!
//! One background task owns the socket. Callers hand it requests over an
//! mpsc channel and wait on a oneshot for the matching response, so any
//! number of requests can be in flight at once. The task reports
//! connectivity to the [`NetworkMonitor`]: online once the handshake
//! completes, offline when the socket closes or fails.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cardsync_core::protocol::{ClientMessage, Outcome, Request, ServerMessage};
use cardsync_core::{Collection, Document, Filter};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use crate::network::NetworkMonitor;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Reply = oneshot::Sender<RemoteResult<Outcome>>;

/// Connection settings for [`WebSocketRemote`].
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Server URL (`ws://` or `wss://`).
    pub url: String,
    /// Time allowed for the handshake and for each request.
    pub request_timeout: Duration,
    /// Consecutive failed connection attempts before `maintain` gives up (0 = unlimited).
    pub max_retries: u32,
    /// Delay before the first retry, doubled after each failure.
    pub initial_delay_ms: u64,
    /// Cap on the retry delay.
    pub max_delay_secs: u64,
}

impl WebSocketConfig {
    pub fn new(url: impl Into<String>) -> Self {
        WebSocketConfig {
            url: url.into(),
            request_timeout: Duration::from_secs(10),
            max_retries: 0,
            initial_delay_ms: 100,
            max_delay_secs: 30,
        }
    }
}

struct Outbound {
    request_id: u64,
    request: Request,
    reply: Reply,
}

struct Link {
    generation: u64,
    tx: mpsc::Sender<Outbound>,
}

struct Shared {
    network: Arc<NetworkMonitor>,
    link: Mutex<Option<Link>>,
    generation: AtomicU64,
}

impl Shared {
    fn link(&self) -> MutexGuard<'_, Option<Link>> {
        match self.link.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn install(&self, tx: mpsc::Sender<Outbound>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        *self.link() = Some(Link { generation, tx });
        generation
    }

    /// Clear the link if it still belongs to `generation`.
    fn release(&self, generation: u64) -> bool {
        let mut link = self.link();
        match link.as_ref() {
            Some(current) if current.generation == generation => {
                *link = None;
                true
            }
            _ => false,
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<Outbound>> {
        self.link().as_ref().map(|l| l.tx.clone())
    }
}

/// [`RemoteStore`] backed by a WebSocket connection.
pub struct WebSocketRemote {
    config: WebSocketConfig,
    shared: Arc<Shared>,
    next_request_id: AtomicU64,
}

impl WebSocketRemote {
    pub fn new(config: WebSocketConfig, network: Arc<NetworkMonitor>) -> Self {
        WebSocketRemote {
            config,
            shared: Arc::new(Shared {
                network,
                link: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.link().is_some()
    }

    /// Make a single connection attempt.
    pub async fn connect(&self) -> RemoteResult<()> {
        self.open().await.map(|_| ())
    }

    /// Close the connection. In-flight requests fail as unavailable.
    pub fn disconnect(&self) {
        let taken = self.shared.link().take();
        if taken.is_some() {
            self.shared.network.set_online(false);
        }
    }

    async fn open(&self) -> RemoteResult<JoinHandle<()>> {
        let connect = tokio_tungstenite::connect_async(self.config.url.as_str());
        let (ws, _) = tokio::time::timeout(self.config.request_timeout, connect)
            .await
            .map_err(|_| RemoteError::Unavailable("connect timed out".to_string()))?
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let (tx, rx) = mpsc::channel(64);
        let generation = self.shared.install(tx);
        tracing::info!(url = %self.config.url, "connected to remote");
        self.shared.network.set_online(true);

        Ok(tokio::spawn(run_link(
            ws,
            rx,
            Arc::clone(&self.shared),
            generation,
        )))
    }

    /// Keep a connection open until cancelled.
    ///
    /// Failed attempts back off exponentially from `initial_delay_ms` up to
    /// `max_delay_secs`. A lost connection is re-established the same way.
    pub async fn maintain(&self, cancel: CancellationToken) {
        let mut attempt = 0u32;
        let mut delay_ms = self.config.initial_delay_ms;

        loop {
            if cancel.is_cancelled() {
                break;
            }
            attempt = attempt.saturating_add(1);

            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.open() => result,
            };

            match result {
                Ok(mut handle) => {
                    attempt = 0;
                    delay_ms = self.config.initial_delay_ms;
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.disconnect();
                            let _ = handle.await;
                            break;
                        }
                        _ = &mut handle => {
                            tracing::info!("connection lost, reconnecting");
                        }
                    }
                }
                Err(e) => {
                    if self.config.max_retries > 0 && attempt >= self.config.max_retries {
                        tracing::warn!(attempt, error = %e, "giving up on remote");
                        break;
                    }
                    tracing::debug!(attempt, delay_ms, error = %e, "connect failed");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
            }
            delay_ms = std::cmp::min(
                delay_ms.saturating_mul(2),
                self.config.max_delay_secs.saturating_mul(1000),
            );
        }
    }

    async fn call(&self, request: Request) -> RemoteResult<Outcome> {
        let tx = self
            .shared
            .sender()
            .ok_or_else(|| RemoteError::Unavailable("not connected".to_string()))?;

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        tx.send(Outbound {
            request_id,
            request,
            reply,
        })
        .await
        .map_err(|_| RemoteError::Unavailable("connection closed".to_string()))?;

        match tokio::time::timeout(self.config.request_timeout, response).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(RemoteError::Unavailable("connection closed".to_string())),
            Err(_) => Err(RemoteError::Unavailable(format!(
                "request {request_id} timed out"
            ))),
        }
    }

    async fn call_ack(&self, request: Request, id: &str) -> RemoteResult<()> {
        let collection = request.collection();
        match self.call(request).await? {
            Outcome::Ack => Ok(()),
            other => Err(unexpected(other, collection, Some(id))),
        }
    }
}

fn unexpected(outcome: Outcome, collection: Collection, id: Option<&str>) -> RemoteError {
    match outcome {
        Outcome::Failure { kind, message } => {
            RemoteError::from_failure(kind, message, collection, id)
        }
        other => RemoteError::Protocol(format!("unexpected outcome: {other:?}")),
    }
}

/// Socket task: forwards requests, routes responses, and fails whatever is
/// still pending when the connection ends.
async fn run_link(
    ws: WsStream,
    mut rx: mpsc::Receiver<Outbound>,
    shared: Arc<Shared>,
    generation: u64,
) {
    let (mut sink, mut stream) = ws.split();
    let mut pending: HashMap<u64, Reply> = HashMap::new();

    let reason = loop {
        tokio::select! {
            out = rx.recv() => match out {
                Some(Outbound { request_id, request, reply }) => {
                    let json = match ClientMessage::request(request_id, request).to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            let _ = reply.send(Err(RemoteError::Protocol(e.to_string())));
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(json.into())).await {
                        let _ = reply.send(Err(RemoteError::Unavailable(e.to_string())));
                        break e.to_string();
                    }
                    pending.retain(|_, r| !r.is_closed());
                    pending.insert(request_id, reply);
                }
                None => {
                    let _ = sink.close().await;
                    break "disconnected".to_string();
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text) {
                    Ok(ServerMessage::Response { request_id, outcome }) => {
                        match pending.remove(&request_id) {
                            Some(reply) => {
                                let _ = reply.send(Ok(outcome));
                            }
                            None => tracing::debug!(request_id, "response for unknown request"),
                        }
                    }
                    Ok(ServerMessage::Pong { .. }) => {}
                    Ok(ServerMessage::Error { message }) => {
                        tracing::warn!(%message, "remote reported error");
                    }
                    Err(e) => tracing::warn!(error = %e, "unparseable frame from remote"),
                },
                Some(Ok(Message::Close(_))) | None => break "connection closed".to_string(),
                Some(Ok(_)) => {}
                Some(Err(e)) => break e.to_string(),
            },
        }
    };

    for (_, reply) in pending.drain() {
        let _ = reply.send(Err(RemoteError::Unavailable(reason.clone())));
    }

    if shared.release(generation) {
        tracing::info!(%reason, "remote connection ended");
        shared.network.set_online(false);
    }
}

impl RemoteStore for WebSocketRemote {
    fn get_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Document>> {
        Box::pin(async move {
            let request = Request::Get {
                collection,
                id: id.to_string(),
            };
            match self.call(request).await? {
                Outcome::Document { document } => Ok(document),
                other => Err(unexpected(other, collection, Some(id))),
            }
        })
    }

    fn set_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        data: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let request = Request::Set {
                collection,
                id: id.to_string(),
                data,
            };
            self.call_ack(request, id).await
        })
    }

    fn update_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        patch: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let request = Request::Update {
                collection,
                id: id.to_string(),
                data: patch,
            };
            self.call_ack(request, id).await
        })
    }

    fn delete_document<'a>(&'a self, collection: Collection, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let request = Request::Delete {
                collection,
                id: id.to_string(),
            };
            self.call_ack(request, id).await
        })
    }

    fn query_collection<'a>(
        &'a self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> RemoteFuture<'a, Vec<Document>> {
        Box::pin(async move {
            match self.call(Request::Query { collection, filters }).await? {
                Outcome::Documents { documents } => Ok(documents),
                other => Err(unexpected(other, collection, None)),
            }
        })
    }
}
