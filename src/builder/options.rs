//! Construction options.

use crate::core::{MachineEvent, StateName};
use crate::emitter::Emitter;
use crate::engine::ExitPolicy;
use std::fmt;
use std::sync::Arc;

/// Options accepted by [`create_machine`](super::create_machine).
///
/// Only `initial_state` is required; everything else has a default.
///
/// # Example
///
/// ```rust
/// use statewire::builder::MachineOptions;
/// use statewire::engine::ExitPolicy;
///
/// let options: MachineOptions = MachineOptions::new("idle")
///     .serialized(true)
///     .exit_policy(ExitPolicy::LegalOnly);
///
/// assert_eq!(options.initial_state.as_deref(), Some("idle"));
/// assert!(options.serialized);
/// ```
pub struct MachineOptions<M = serde_json::Value> {
    /// State the machine starts in; must be declared by the configuration
    pub initial_state: Option<StateName>,

    /// Notification capability; an in-memory emitter is created when `None`
    pub emitter: Option<Arc<dyn Emitter<MachineEvent<M>>>>,

    /// Run at most one transition at a time, in call order
    pub serialized: bool,

    /// Record committed transitions
    pub track_history: bool,

    /// When the exit notification fires
    pub exit_policy: ExitPolicy,
}

impl<M> MachineOptions<M> {
    pub fn new(initial_state: impl Into<StateName>) -> Self {
        Self {
            initial_state: Some(initial_state.into()),
            ..Self::default()
        }
    }

    pub fn initial_state(mut self, state: impl Into<StateName>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    pub fn emitter(mut self, emitter: Arc<dyn Emitter<MachineEvent<M>>>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn serialized(mut self, serialized: bool) -> Self {
        self.serialized = serialized;
        self
    }

    pub fn track_history(mut self, track: bool) -> Self {
        self.track_history = track;
        self
    }

    pub fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }
}

impl<M> Default for MachineOptions<M> {
    fn default() -> Self {
        Self {
            initial_state: None,
            emitter: None,
            serialized: false,
            track_history: false,
            exit_policy: ExitPolicy::default(),
        }
    }
}

impl<M> fmt::Debug for MachineOptions<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineOptions")
            .field("initial_state", &self.initial_state)
            .field("custom_emitter", &self.emitter.is_some())
            .field("serialized", &self.serialized)
            .field("track_history", &self.track_history)
            .field("exit_policy", &self.exit_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unserialized_without_history() {
        let options: MachineOptions = MachineOptions::default();

        assert!(options.initial_state.is_none());
        assert!(options.emitter.is_none());
        assert!(!options.serialized);
        assert!(!options.track_history);
        assert_eq!(options.exit_policy, ExitPolicy::EveryAttempt);
    }
}
