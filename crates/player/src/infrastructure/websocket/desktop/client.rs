//! Desktop WebSocket transport using tokio-tungstenite

use futures_util::{stream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::ports::outbound::{ChannelTransport, FrameStream, TransportError};

/// Opens push channels over real WebSockets.
///
/// Only inbound text frames are surfaced. A server close frame or the end of
/// the socket ends the stream; a socket error is yielded once and then the
/// stream ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ChannelTransport for TungsteniteTransport {
    async fn connect(&self, url: &Url) -> Result<FrameStream, TransportError> {
        let (ws_stream, _) = connect_async(url.as_str()).await.map_err(|e| {
            tracing::error!("Failed to connect to {}: {}", url.path(), e);
            TransportError::Connect(e.to_string())
        })?;
        tracing::info!("Connected to {}", url.path());

        // Write half lives as long as the read loop.
        let (write, read) = ws_stream.split();

        let frames = stream::unfold(Some((write, read)), |state| async move {
            let (write, mut read) = state?;
            loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => return Some((Ok(text), Some((write, read)))),
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Server closed connection");
                        return None;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        return Some((Err(TransportError::Socket(e.to_string())), None));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(frames))
    }
}
