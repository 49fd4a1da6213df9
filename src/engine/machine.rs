//! The transition engine and the live machine handle.

use crate::core::{
    EnterEvent, ExitEvent, MachineConfig, MachineEvent, Metadata, StateHistory, StateName,
    StateTransition,
};
use crate::emitter::{Emitter, Handler, Subscription};
use crate::engine::dispatch::{Action, ActionTable};
use crate::engine::error::MachineError;
use crate::engine::notifier::{NotifierTable, StateNotifier};
use crate::engine::{enter_adapter, exit_adapter, state_channel, ENTER_CHANNEL, EXIT_CHANNEL};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// When the exit notification is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExitPolicy {
    /// Publish on every call, including calls whose action turns out not to
    /// be legal from the current state.
    #[default]
    EveryAttempt,

    /// Publish only when the current state declares the action.
    LegalOnly,
}

/// Runtime knobs fixed at construction.
pub(crate) struct EngineSettings<M> {
    pub emitter: Arc<dyn Emitter<MachineEvent<M>>>,
    pub serialized: bool,
    pub track_history: bool,
    pub exit_policy: ExitPolicy,
}

/// Owner of the current-state cell and executor of the transition protocol.
pub(crate) struct Engine<M> {
    config: MachineConfig<M>,
    initial: StateName,
    current: RwLock<StateName>,
    emitter: Arc<dyn Emitter<MachineEvent<M>>>,
    queue: Option<Mutex<()>>,
    history: Option<RwLock<StateHistory>>,
    exit_policy: ExitPolicy,
}

impl<M: Metadata> Engine<M> {
    pub(crate) fn new(config: MachineConfig<M>, initial: StateName, settings: EngineSettings<M>) -> Self {
        Self {
            config,
            current: RwLock::new(initial.clone()),
            initial,
            emitter: settings.emitter,
            queue: settings.serialized.then(|| Mutex::new(())),
            history: settings.track_history.then(|| RwLock::new(StateHistory::new())),
            exit_policy: settings.exit_policy,
        }
    }

    pub(crate) fn config(&self) -> &MachineConfig<M> {
        &self.config
    }

    pub(crate) fn state(&self) -> StateName {
        self.current.read().clone()
    }

    pub(crate) fn is_legal(&self, action: &str) -> bool {
        self.config
            .transition_fn(&self.current.read(), action)
            .is_some()
    }

    /// Run exit -> compute -> enter for `action`.
    ///
    /// The suspension points are the exit publish, the transition function,
    /// and the two enter publishes. Without the serialized queue, concurrent
    /// calls interleave at those points and the last commit wins.
    pub(crate) async fn transition(
        &self,
        action: &str,
        meta: Option<M>,
    ) -> Result<Option<StateName>, MachineError> {
        let _turn = match &self.queue {
            Some(queue) => Some(queue.lock().await),
            None => None,
        };

        let attempted = self.state();
        if self.exit_policy == ExitPolicy::LegalOnly
            && self.config.transition_fn(&attempted, action).is_none()
        {
            debug!(action, state = %attempted, "action not legal, skipping");
            return Ok(None);
        }

        let exit = ExitEvent {
            action: action.to_string(),
            current: attempted,
            meta: meta.clone(),
        };
        self.publish(EXIT_CHANNEL, MachineEvent::Exit(exit)).await?;

        let last = self.state();
        let Some(compute) = self.config.transition_fn(&last, action).cloned() else {
            debug!(action, state = %last, "action not legal, no transition");
            return Ok(None);
        };

        let next = compute(meta.clone())
            .await
            .map_err(|source| MachineError::TransitionFailed {
                action: action.to_string(),
                from: last.clone(),
                source,
            })?;
        let next = self.check_successor(action, &last, next)?;

        *self.current.write() = next.clone();
        if let Some(history) = &self.history {
            history.write().push(StateTransition {
                from: last.clone(),
                to: next.clone(),
                action: action.to_string(),
                timestamp: Utc::now(),
            });
        }
        debug!(action, from = %last, to = %next, "transition committed");

        let enter = EnterEvent {
            action: action.to_string(),
            current: next.clone(),
            last,
            meta,
        };
        self.publish(ENTER_CHANNEL, MachineEvent::Enter(enter.clone()))
            .await?;
        self.publish(&state_channel(&next), MachineEvent::Enter(enter))
            .await?;

        Ok(Some(next))
    }

    fn check_successor(
        &self,
        action: &str,
        from: &str,
        next: Option<StateName>,
    ) -> Result<StateName, MachineError> {
        match next {
            Some(next) if self.config.contains_state(&next) => Ok(next),
            Some(next) => {
                warn!(action, from, to = %next, "transition resolved to undeclared state");
                Err(MachineError::UnknownSuccessor {
                    action: action.to_string(),
                    from: from.to_string(),
                    to: next,
                })
            }
            None => {
                warn!(action, from, "transition resolved to no state");
                Err(MachineError::NoSuccessor {
                    action: action.to_string(),
                    from: from.to_string(),
                })
            }
        }
    }

    async fn publish(&self, channel: &str, event: MachineEvent<M>) -> Result<(), MachineError> {
        self.emitter
            .publish(channel, event)
            .await
            .map_err(|source| MachineError::HandlerFailed {
                channel: channel.to_string(),
                source,
            })
    }

    fn subscribe(&self, channel: &str, handler: Handler<MachineEvent<M>>) -> Subscription {
        let id = self.emitter.subscribe(channel, handler);
        Subscription::new(Arc::clone(&self.emitter), channel, id)
    }
}

/// Live state machine.
///
/// Cloning the handle is cheap; clones share the same current state,
/// dispatch table and subscriptions.
///
/// # Example
///
/// ```rust
/// use statewire::builder::MachineBuilder;
/// use statewire::core::{MachineConfig, StateDefinition};
///
/// # futures::executor::block_on(async {
/// let config: MachineConfig = MachineConfig::new()
///     .state("off", StateDefinition::new().goto("switchOn", "on"))
///     .state("on", StateDefinition::new().goto("switchOff", "off"));
///
/// let machine = MachineBuilder::new(config).initial_state("off").build().unwrap();
///
/// let state = machine.dispatch("switchOn", None).await.unwrap();
/// assert_eq!(state.as_deref(), Some("on"));
/// assert_eq!(machine.state(), "on");
/// # });
/// ```
pub struct MachineHandle<M = serde_json::Value> {
    engine: Arc<Engine<M>>,
    actions: Arc<ActionTable<M>>,
    notifiers: Arc<NotifierTable<M>>,
}

impl<M: Metadata> MachineHandle<M> {
    pub(crate) fn new(engine: Engine<M>) -> Self {
        let engine = Arc::new(engine);
        let actions = ActionTable::build(&engine);
        let notifiers = NotifierTable::build(engine.config().state_names(), &engine.emitter);

        debug!(
            initial = %engine.initial,
            states = engine.config().len(),
            actions = actions.len(),
            serialized = engine.queue.is_some(),
            "machine constructed"
        );

        Self {
            engine,
            actions: Arc::new(actions),
            notifiers: Arc::new(notifiers),
        }
    }

    /// The last committed state.
    pub fn state(&self) -> StateName {
        self.engine.state()
    }

    pub fn initial_state(&self) -> &str {
        &self.engine.initial
    }

    pub fn config(&self) -> &MachineConfig<M> {
        self.engine.config()
    }

    /// Snapshot of committed transitions, when history tracking is enabled.
    pub fn history(&self) -> Option<StateHistory> {
        self.engine
            .history
            .as_ref()
            .map(|history| history.read().clone())
    }

    /// Actions legal from the current state.
    pub fn available_actions(&self) -> Vec<String> {
        let current = self.engine.state();
        self.config()
            .get(&current)
            .map(|def| def.action_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Low-level entry point: run the transition protocol for any action name.
    ///
    /// Resolves to the newly committed state, or `None` when `action` is not
    /// legal from the current state.
    pub async fn transition(
        &self,
        action: &str,
        meta: Option<M>,
    ) -> Result<Option<StateName>, MachineError> {
        self.engine.transition(action, meta).await
    }

    pub fn actions(&self) -> &ActionTable<M> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&Action<M>> {
        self.actions.get(name)
    }

    /// Call the action named `name` through the dispatch table.
    ///
    /// Unlike [`MachineHandle::transition`], names not declared by any state
    /// are rejected with [`MachineError::UnknownAction`].
    pub async fn dispatch(
        &self,
        name: &str,
        meta: Option<M>,
    ) -> Result<Option<StateName>, MachineError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| MachineError::UnknownAction {
                action: name.to_string(),
            })?;
        action.call(meta).await
    }

    pub fn notifiers(&self) -> &NotifierTable<M> {
        &self.notifiers
    }

    /// Look up a per-state subscription entry point by its identifier (`onIdle`).
    pub fn notifier(&self, name: &str) -> Option<&StateNotifier<M>> {
        self.notifiers.get(name)
    }

    /// Subscribe to a state's channel by state name.
    ///
    /// Returns `None` when `state` is not declared.
    pub fn on_state(&self, state: &str, handler: Handler<EnterEvent<M>>) -> Option<Subscription> {
        self.notifiers
            .for_state(state)
            .map(|notifier| notifier.subscribe(handler))
    }

    /// Subscribe to every commit.
    pub fn on_enter(&self, handler: Handler<EnterEvent<M>>) -> Subscription {
        self.engine.subscribe(ENTER_CHANNEL, enter_adapter(handler))
    }

    /// Subscribe to every transition attempt.
    pub fn on_exit(&self, handler: Handler<ExitEvent<M>>) -> Subscription {
        self.engine.subscribe(EXIT_CHANNEL, exit_adapter(handler))
    }
}

impl<M> Clone for MachineHandle<M> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            actions: Arc::clone(&self.actions),
            notifiers: Arc::clone(&self.notifiers),
        }
    }
}

impl<M> fmt::Debug for MachineHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineHandle")
            .field("current", &*self.engine.current.read())
            .field("actions", &self.actions)
            .field("notifiers", &self.notifiers)
            .finish()
    }
}
