//! Single ordered dispatcher for both channels.
//!
//! Frames are translated and emitted one at a time in receipt order, so
//! reducers never see two push events concurrently.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::manager::ManagerInner;
use crate::state::ChannelKind;

#[derive(Debug)]
pub(super) struct InboundFrame {
    pub channel: ChannelKind,
    pub generation: u64,
    pub text: String,
}

pub(super) async fn run_dispatcher(
    inner: Arc<ManagerInner>,
    mut frames: mpsc::UnboundedReceiver<InboundFrame>,
) {
    while let Some(frame) = frames.recv().await {
        if !inner.is_current(frame.channel, frame.generation) {
            tracing::debug!(channel = %frame.channel, "Dropping frame from stale channel");
            continue;
        }
        let Some(event) = inner.translator.translate(frame.channel, &frame.text).await else {
            continue;
        };
        // Enrichment may await; the channel can be replaced meanwhile.
        if !inner.is_current(frame.channel, frame.generation) {
            tracing::debug!(channel = %frame.channel, "Channel replaced during translation");
            continue;
        }
        inner.router.emit(event);
    }
    tracing::debug!("Dispatcher stopped");
}
