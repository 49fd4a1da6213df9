//! In-memory emitter used by default.

use super::{Emitter, Handler, HandlerError, SubscriptionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory [`Emitter`] keyed by channel name.
///
/// Handlers are kept per channel in registration order. `publish` takes a
/// snapshot of the channel's handlers before running them, so handlers may
/// subscribe or unsubscribe while a publish is in flight; such changes apply
/// to the next publish.
pub struct ChannelEmitter<P> {
    channels: RwLock<HashMap<String, Vec<(SubscriptionId, Handler<P>)>>>,
}

impl<P> ChannelEmitter<P> {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Number of handlers currently registered on `channel`.
    pub fn handler_count(&self, channel: &str) -> usize {
        self.channels.read().get(channel).map_or(0, Vec::len)
    }

    fn snapshot(&self, channel: &str) -> Vec<Handler<P>> {
        self.channels
            .read()
            .get(channel)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}

impl<P> Default for ChannelEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P: Clone + Send + Sync + 'static> Emitter<P> for ChannelEmitter<P> {
    fn subscribe(&self, channel: &str, handler: Handler<P>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.channels
            .write()
            .entry(channel.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> bool {
        let mut channels = self.channels.write();
        let Some(handlers) = channels.get_mut(channel) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != id);
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            channels.remove(channel);
        }
        removed
    }

    async fn publish(&self, channel: &str, payload: P) -> Result<(), HandlerError> {
        let handlers = self.snapshot(channel);
        tracing::trace!(channel, handlers = handlers.len(), "publishing");

        for handler in handlers {
            handler(payload.clone()).await?;
        }
        Ok(())
    }
}
