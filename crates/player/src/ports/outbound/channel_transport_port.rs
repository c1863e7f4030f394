//! Channel Transport Port - push socket boundary
//!
//! A transport turns a URL into a stream of inbound text frames. The stream
//! ending (or yielding an error) means the socket closed; reconnect policy is
//! owned by the realtime manager, not the transport.

use std::pin::Pin;

use futures_util::Stream;
use thiserror::Error;
use url::Url;

/// Inbound text frames of one open socket.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Socket error: {0}")]
    Socket(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Open a socket to `url`.
    async fn connect(&self, url: &Url) -> Result<FrameStream, TransportError>;
}
