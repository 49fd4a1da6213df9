//! The live machine: transition protocol, dispatch and notifier tables.
//!
//! # Transition protocol
//!
//! Every call to `transition` (or to an [`Action`]) runs, in order:
//!
//! 1. Publish [`ExitEvent`] on [`EXIT_CHANNEL`] and wait for its handlers.
//! 2. Look up the function for (current state, action); stop with `None` if absent.
//! 3. Invoke the function with the metadata and wait for the successor.
//! 4. Commit the successor as the current state.
//! 5. Publish [`EnterEvent`] on [`ENTER_CHANNEL`].
//! 6. Publish the same event on the entered state's channel.
//!
//! A failure at any step is returned to the caller and ends the protocol.
//!
//! [`ExitEvent`]: crate::core::ExitEvent
//! [`EnterEvent`]: crate::core::EnterEvent

mod dispatch;
mod error;
mod machine;
mod notifier;

pub use dispatch::{Action, ActionTable};
pub use error::MachineError;
pub use machine::{ExitPolicy, MachineHandle};
pub use notifier::{notifier_name, NotifierTable, StateNotifier};

pub(crate) use machine::{Engine, EngineSettings};

use crate::core::{EnterEvent, ExitEvent, MachineEvent};
use crate::emitter::Handler;
use futures::FutureExt;
use std::sync::Arc;

/// Channel carrying every exit notification.
pub const EXIT_CHANNEL: &str = "machine:exit";

/// Channel carrying every machine-wide enter notification.
pub const ENTER_CHANNEL: &str = "machine:enter";

/// Channel carrying enter notifications for one state.
pub fn state_channel(state: &str) -> String {
    format!("state:{state}")
}

pub(crate) fn enter_adapter<M: Send + 'static>(
    handler: Handler<EnterEvent<M>>,
) -> Handler<MachineEvent<M>> {
    Arc::new(move |event: MachineEvent<M>| match event {
        MachineEvent::Enter(enter) => handler(enter),
        MachineEvent::Exit(_) => futures::future::ok(()).boxed(),
    })
}

pub(crate) fn exit_adapter<M: Send + 'static>(
    handler: Handler<ExitEvent<M>>,
) -> Handler<MachineEvent<M>> {
    Arc::new(move |event: MachineEvent<M>| match event {
        MachineEvent::Exit(exit) => handler(exit),
        MachineEvent::Enter(_) => futures::future::ok(()).boxed(),
    })
}
