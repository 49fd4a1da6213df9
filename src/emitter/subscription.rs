//! Handle returned by every machine subscription.

use super::{Emitter, SubscriptionId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Cancel = Box<dyn FnOnce() -> bool + Send>;

/// Registration of one handler; call [`Subscription::unsubscribe`] to remove it.
///
/// Dropping a `Subscription` does not unsubscribe: the handler stays
/// registered for as long as the emitter lives.
pub struct Subscription {
    id: SubscriptionId,
    channel: String,
    cancel: Mutex<Option<Cancel>>,
}

impl Subscription {
    pub(crate) fn new<P: Send + 'static>(
        emitter: Arc<dyn Emitter<P>>,
        channel: impl Into<String>,
        id: SubscriptionId,
    ) -> Self {
        let channel = channel.into();
        let target = channel.clone();
        Self {
            id,
            channel,
            cancel: Mutex::new(Some(Box::new(move || emitter.unsubscribe(&target, id)))),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Remove the handler. Calling this more than once has no further effect.
    ///
    /// Returns `true` only for the call that actually removed the handler.
    pub fn unsubscribe(&self) -> bool {
        match self.cancel.lock().take() {
            Some(cancel) => cancel(),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}
