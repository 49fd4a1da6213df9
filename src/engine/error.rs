//! Errors raised while running a transition.

use crate::core::BoxError;
use crate::emitter::HandlerError;
use thiserror::Error;

/// Errors returned from `transition` and action calls.
///
/// An action that is not legal from the current state is not an error; it
/// resolves to `Ok(None)`.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Action '{action}' failed in state '{from}': {source}")]
    TransitionFailed {
        action: String,
        from: String,
        #[source]
        source: BoxError,
    },

    #[error("Action '{action}' in state '{from}' resolved to no state")]
    NoSuccessor { action: String, from: String },

    #[error("Action '{action}' in state '{from}' resolved to undeclared state '{to}'")]
    UnknownSuccessor {
        action: String,
        from: String,
        to: String,
    },

    #[error("Handler on channel '{channel}' failed: {source}")]
    HandlerFailed {
        channel: String,
        #[source]
        source: HandlerError,
    },

    #[error("Action '{action}' is not declared by any state")]
    UnknownAction { action: String },
}

impl MachineError {
    /// Recover the error raised by caller code (transition function or handler).
    pub fn into_source(self) -> Option<BoxError> {
        match self {
            Self::TransitionFailed { source, .. } => Some(source),
            Self::HandlerFailed { source, .. } => Some(source.into_inner()),
            _ => None,
        }
    }

    /// True when the current state was left untouched by the failed call.
    ///
    /// Only handler failures raised after the commit (enter or per-state
    /// channels) leave the machine in the new state.
    pub fn before_commit(&self) -> bool {
        match self {
            Self::HandlerFailed { channel, .. } => channel == super::EXIT_CHANNEL,
            _ => true,
        }
    }
}
