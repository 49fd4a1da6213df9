//! Publish/subscribe capability used for lifecycle notifications.
//!
//! The machine only depends on the narrow [`Emitter`] trait, so any
//! conforming implementation can be injected at construction. The crate
//! ships [`ChannelEmitter`], an in-memory implementation used when none is
//! supplied.
//!
//! # Contract
//!
//! - `subscribe` registers a handler on a named channel and returns an id.
//! - `unsubscribe` removes exactly the handler registered under that id.
//! - `publish` resolves only after every handler registered at the time of
//!   the call has completed, one at a time, in registration order. The first
//!   handler failure stops the publish and is returned.

mod channel;
mod subscription;

pub use channel::ChannelEmitter;
pub use subscription::Subscription;

use crate::core::BoxError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Failure raised by a notification handler.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(#[from] BoxError);

impl HandlerError {
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(error.into())
    }

    /// Recover the error raised by the handler.
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

/// Asynchronous notification handler.
pub type Handler<P> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

/// Identifier of one handler registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Narrow publish/subscribe capability.
#[async_trait]
pub trait Emitter<P: Send + 'static>: Send + Sync {
    /// Register `handler` on `channel`.
    fn subscribe(&self, channel: &str, handler: Handler<P>) -> SubscriptionId;

    /// Remove the handler registered under `id`.
    ///
    /// Returns `false` when no such registration exists.
    fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> bool;

    /// Deliver `payload` to every handler of `channel` and wait for all of them.
    async fn publish(&self, channel: &str, payload: P) -> Result<(), HandlerError>;
}

/// Wrap a closure returning a future into a [`Handler`].
///
/// # Example
///
/// ```rust
/// use statewire::emitter::{handler, Handler};
///
/// let log: Handler<String> = handler(|message: String| async move {
///     println!("{message}");
///     Ok(())
/// });
/// ```
pub fn handler<P, F, Fut>(f: F) -> Handler<P>
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    use futures::FutureExt;
    Arc::new(move |payload: P| f(payload).boxed())
}
