//! Per-channel connect / read / reconnect loop.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use url::Url;

use super::dispatcher::InboundFrame;
use super::manager::ManagerInner;
use crate::infrastructure::websocket::BackoffState;
use crate::state::{ChannelKind, ChannelState};

pub(super) async fn run_channel(
    inner: Arc<ManagerInner>,
    channel: ChannelKind,
    generation: u64,
    url: Url,
    frames: mpsc::UnboundedSender<InboundFrame>,
) {
    let mut backoff = BackoffState::new(inner.policy);

    loop {
        if !inner.set_state(channel, generation, ChannelState::Connecting) {
            return;
        }

        match inner.transport.connect(&url).await {
            Ok(mut stream) => {
                if !inner.set_state(channel, generation, ChannelState::Open) {
                    return;
                }
                tracing::info!(%channel, generation, "Channel open");
                backoff.reset();

                while let Some(item) = stream.next().await {
                    match item {
                        Ok(text) => {
                            let frame = InboundFrame {
                                channel,
                                generation,
                                text,
                            };
                            if frames.send(frame).is_err() {
                                tracing::debug!(%channel, "Dispatcher gone; stopping channel");
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(%channel, "Socket error: {}", e);
                            break;
                        }
                    }
                }
                tracing::info!(%channel, generation, "Channel closed");
            }
            Err(e) => {
                tracing::warn!(%channel, attempt = backoff.attempts(), "Connect failed: {}", e);
            }
        }

        let Some(delay) = backoff.next_delay_and_advance() else {
            tracing::error!(%channel, "Max reconnection attempts reached, giving up");
            inner.set_state(channel, generation, ChannelState::Offline);
            return;
        };
        let closed = ChannelState::Closed {
            retry_in_ms: delay,
            attempt: backoff.attempts(),
        };
        if !inner.set_state(channel, generation, closed) {
            return;
        }
        tracing::info!(
            %channel,
            "Reconnection attempt {} of {}, waiting {}ms",
            backoff.attempts(),
            inner.policy.max_attempts,
            delay
        );
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}
