//! Remote Platform
//!
//! HTTP implementations of the three capability traits. Unary calls run a
//! request to completion on whatever thread invokes them (the app always
//! calls them from worker threads); subscriptions spawn a dedicated thread
//! that holds a streaming response open and pushes decoded frames into the
//! caller's channel.
//!
//! The stream format is line-delimited: frames arrive as `data: <json>`
//! lines, blank lines and `:` comments are ignored. Lost connections are
//! re-established with capped exponential backoff; reconnection is the
//! platform's fan-out duty and is not surfaced as a user-visible error,
//! except for the very first session resolution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::runtime::Runtime;

use crate::platform::{
    BlobStore, IdentityGateway, MessageQuery, MessageStore, Platform, SessionEvent, Snapshot,
    Subscription,
};
use crate::shared::error::PlatformError;
use crate::shared::message::{Message, NewMessage};
use crate::shared::session::Session;

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Entry point: build the capability bundle for a backend base URL.
pub struct RemotePlatform;

impl RemotePlatform {
    pub fn connect(base_url: impl Into<String>) -> Platform {
        let base_url = base_url.into();
        Platform {
            identity: Arc::new(RemoteIdentity::new(base_url.clone())),
            store: Arc::new(RemoteStore::new(base_url.clone())),
            blobs: Arc::new(RemoteBlobs::new(base_url)),
        }
    }
}

fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn block_on<F, T>(future: F) -> Result<T, PlatformError>
where
    F: std::future::Future<Output = Result<T, PlatformError>>,
{
    let rt = Runtime::new()
        .map_err(|e| PlatformError::network(format!("failed to create runtime: {}", e)))?;
    rt.block_on(future)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| status.to_string());
    Err(PlatformError::backend(format!("{} - {}", status, body)))
}

/// Splits a streaming body into complete `data:` frame payloads, tolerating
/// frames that arrive split across chunks.
#[derive(Default)]
struct LineFramer {
    buffer: String,
}

impl LineFramer {
    fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].trim_end_matches('\r').to_string();
            self.buffer.drain(..=newline);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(payload) = line.strip_prefix("data: ") {
                frames.push(payload.to_string());
            } else {
                tracing::warn!("ignoring unframed stream line: {}", line);
            }
        }
        frames
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

struct RemoteIdentity {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SessionFrame {
    #[serde(default)]
    session: Option<Session>,
}

impl RemoteIdentity {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }
}

impl IdentityGateway for RemoteIdentity {
    fn observe(&self, events: Sender<SessionEvent>) -> Subscription {
        let url = api_url(&self.base_url, "/api/session");
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        std::thread::spawn(move || watch_session(url, events, thread_stop));

        Subscription::new(move || stop.store(true, Ordering::SeqCst))
    }

    fn sign_in(&self) -> Result<Session, PlatformError> {
        let url = api_url(&self.base_url, "/api/session/sign-in");
        let client = self.client.clone();
        block_on(async move {
            let response = client
                .post(&url)
                .send()
                .await
                .map_err(|e| PlatformError::network(e.to_string()))?;
            let response = check_status(response).await?;
            response
                .json::<Session>()
                .await
                .map_err(|e| PlatformError::decode(e.to_string()))
        })
    }

    fn sign_out(&self) -> Result<(), PlatformError> {
        let url = api_url(&self.base_url, "/api/session/sign-out");
        let client = self.client.clone();
        block_on(async move {
            let response = client
                .post(&url)
                .send()
                .await
                .map_err(|e| PlatformError::network(e.to_string()))?;
            check_status(response).await.map(|_| ())
        })
    }
}

fn watch_session(url: String, events: Sender<SessionEvent>, stop: Arc<AtomicBool>) {
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create runtime for session watch: {}", e);
            return;
        }
    };

    rt.block_on(async {
        let client = Client::new();
        let mut delay = INITIAL_RECONNECT_DELAY;
        // The first resolution failure is reported to the UI; later ones are
        // reconnected silently.
        let mut resolved = false;
        let mut failure_reported = false;

        loop {
            if stop.load(Ordering::SeqCst) {
                return;
            }

            let connect = async {
                let response = client
                    .get(&url)
                    .header("Subscribe", "true")
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                if !response.status().is_success() {
                    return Err(format!("http {}", response.status()));
                }
                Ok(response)
            };

            let response = match connect.await {
                Ok(response) => response,
                Err(reason) => {
                    tracing::warn!("session watch connect failed (will retry): {}", reason);
                    if !resolved && !failure_reported {
                        failure_reported = true;
                        if events.send(SessionEvent::ResolutionFailed(reason)).is_err() {
                            return;
                        }
                    }
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, MAX_RECONNECT_DELAY);
                    continue;
                }
            };

            tracing::info!("session watch connected");
            delay = INITIAL_RECONNECT_DELAY;
            let mut framer = LineFramer::default();
            let mut stream = response.bytes_stream();

            while let Some(chunk) = stream.next().await {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!("session stream error: {}", e);
                        break;
                    }
                };
                let text = match std::str::from_utf8(&chunk) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("invalid utf-8 in session stream: {}", e);
                        break;
                    }
                };
                for payload in framer.push(text) {
                    match serde_json::from_str::<SessionFrame>(&payload) {
                        Ok(frame) => {
                            resolved = true;
                            if events.send(SessionEvent::Changed(frame.session)).is_err() {
                                return;
                            }
                        }
                        Err(e) => tracing::warn!("undecodable session frame: {}", e),
                    }
                }
            }

            tracing::warn!("session stream closed, reconnecting");
            tokio::time::sleep(delay).await;
            delay = std::cmp::min(delay * 2, MAX_RECONNECT_DELAY);
        }
    });
}

// ---------------------------------------------------------------------------
// Message store
// ---------------------------------------------------------------------------

struct RemoteStore {
    base_url: String,
    client: Client,
}

impl RemoteStore {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }
}

impl MessageStore for RemoteStore {
    fn subscribe(&self, query: MessageQuery, snapshots: Sender<Snapshot>) -> Subscription {
        let url = api_url(
            &self.base_url,
            &format!("/api/messages?limit={}", query.limit),
        );
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        std::thread::spawn(move || watch_messages(url, snapshots, thread_stop));

        Subscription::new(move || stop.store(true, Ordering::SeqCst))
    }

    fn insert(&self, message: NewMessage) -> Result<(), PlatformError> {
        let url = api_url(&self.base_url, "/api/messages");
        let client = self.client.clone();
        block_on(async move {
            let response = client
                .post(&url)
                .json(&message)
                .send()
                .await
                .map_err(|e| PlatformError::network(e.to_string()))?;
            check_status(response).await.map(|_| ())
        })
    }
}

fn watch_messages(url: String, snapshots: Sender<Snapshot>, stop: Arc<AtomicBool>) {
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create runtime for message subscription: {}", e);
            return;
        }
    };

    rt.block_on(async {
        let client = Client::new();
        let mut delay = INITIAL_RECONNECT_DELAY;

        loop {
            if stop.load(Ordering::SeqCst) {
                return;
            }

            let response = match client.get(&url).header("Subscribe", "true").send().await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    tracing::warn!(
                        "message subscription refused with {} (will retry)",
                        response.status()
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, MAX_RECONNECT_DELAY);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("message subscription connect failed (will retry): {}", e);
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, MAX_RECONNECT_DELAY);
                    continue;
                }
            };

            tracing::info!("message subscription established");
            delay = INITIAL_RECONNECT_DELAY;
            let mut framer = LineFramer::default();
            let mut stream = response.bytes_stream();

            while let Some(chunk) = stream.next().await {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!("message stream error: {}", e);
                        break;
                    }
                };
                let text = match std::str::from_utf8(&chunk) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("invalid utf-8 in message stream: {}", e);
                        break;
                    }
                };
                for payload in framer.push(text) {
                    match serde_json::from_str::<Vec<Message>>(&payload) {
                        Ok(messages) => {
                            if snapshots.send(Snapshot { messages }).is_err() {
                                return;
                            }
                        }
                        Err(e) => tracing::warn!("undecodable snapshot frame: {}", e),
                    }
                }
            }

            tracing::warn!("message stream closed, reconnecting");
            tokio::time::sleep(delay).await;
            delay = std::cmp::min(delay * 2, MAX_RECONNECT_DELAY);
        }
    });
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

struct RemoteBlobs {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl RemoteBlobs {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }
}

impl BlobStore for RemoteBlobs {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, PlatformError> {
        let url = api_url(&self.base_url, &format!("/api/blobs/{}", path));
        let client = self.client.clone();
        let body = bytes.to_vec();
        block_on(async move {
            let response = client
                .post(&url)
                .header("Content-Type", "application/octet-stream")
                .body(body)
                .send()
                .await
                .map_err(|e| PlatformError::network(e.to_string()))?;
            let response = check_status(response).await?;
            response
                .json::<UploadResponse>()
                .await
                .map(|r| r.url)
                .map_err(|e| PlatformError::decode(e.to_string()))
        })
    }
}
