//! In-memory `ChannelTransport` driven by the test.
//!
//! Sockets are scripted per URL path and handed out in order. A scripted
//! socket stays open until its [`ScriptedSocket`] is closed or dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use futures_util::stream;
use tokio::sync::mpsc;
use url::Url;

use crate::ports::outbound::{ChannelTransport, FrameStream, TransportError};

type FrameSender = mpsc::UnboundedSender<Result<String, TransportError>>;
type FrameReceiver = mpsc::UnboundedReceiver<Result<String, TransportError>>;

enum Script {
    Refuse(String),
    Socket(FrameReceiver),
}

#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Script>>>,
    connects: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a socket that the next connect to `path` will receive.
    pub fn socket(&self, path: &str) -> ScriptedSocket {
        let (tx, rx) = mpsc::unbounded_channel();
        self.push(path, Script::Socket(rx));
        ScriptedSocket { tx }
    }

    /// Queue a refused connect for `path`.
    pub fn refuse(&self, path: &str, reason: &str) {
        self.push(path, Script::Refuse(reason.to_string()));
    }

    pub fn connect_count(&self, path: &str) -> usize {
        self.connects
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|url| url.path() == path)
            .count()
    }

    pub fn connected_urls(&self) -> Vec<Url> {
        self.connects
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn push(&self, path: &str, script: Script) {
        self.scripts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(path.to_string())
            .or_default()
            .push_back(script);
    }
}

#[async_trait::async_trait]
impl ChannelTransport for ScriptedTransport {
    async fn connect(&self, url: &Url) -> Result<FrameStream, TransportError> {
        self.connects
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.clone());
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get_mut(url.path())
            .and_then(VecDeque::pop_front);

        match script {
            Some(Script::Socket(rx)) => Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            }))),
            Some(Script::Refuse(reason)) => Err(TransportError::Connect(reason)),
            None => Err(TransportError::Connect(format!(
                "no scripted socket for {}",
                url.path()
            ))),
        }
    }
}

/// Test-side end of a scripted socket.
pub struct ScriptedSocket {
    tx: FrameSender,
}

impl ScriptedSocket {
    /// Deliver a text frame. Returns `false` once the reader is gone.
    pub fn send(&self, frame: impl Into<String>) -> bool {
        self.tx.send(Ok(frame.into())).is_ok()
    }

    pub fn send_json(&self, frame: &serde_json::Value) -> bool {
        self.send(frame.to_string())
    }

    /// Fail the socket with an error; the reader sees the stream end after it.
    pub fn fail(self, reason: &str) {
        let _ = self.tx.send(Err(TransportError::Socket(reason.to_string())));
    }

    pub fn close(self) {}
}
