//! Declarative state/action tables.
//!
//! A [`MachineConfig`] maps every state name to a [`StateDefinition`], which
//! in turn maps action names to the transition functions that compute the
//! successor state. The configuration is pure data: it has no behavior of
//! its own and is never mutated once handed to a machine.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

/// Identifier of one node in the machine's state set.
pub type StateName = String;

/// Identifier of one caller-invokable operation.
pub type ActionName = String;

/// Error type for failures raised by caller-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Bound satisfied by every metadata type a machine can carry.
pub trait Metadata: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Metadata for T {}

/// Function bound to one (state, action) pair.
///
/// Receives the optional metadata passed to the action call and resolves to
/// the successor state, or `None` when it computes no successor.
pub type TransitionFn<M> =
    Arc<dyn Fn(Option<M>) -> BoxFuture<'static, Result<Option<StateName>, BoxError>> + Send + Sync>;

/// Action table of a single state.
///
/// A state with no actions is terminal: it can be entered, but every action
/// dispatched while it is current is a no-op.
///
/// # Example
///
/// ```rust
/// use statewire::core::StateDefinition;
///
/// let off: StateDefinition = StateDefinition::new().goto("switchOn", "on");
/// assert!(off.has_action("switchOn"));
/// assert!(!off.is_terminal());
/// ```
pub struct StateDefinition<M = serde_json::Value> {
    actions: BTreeMap<ActionName, TransitionFn<M>>,
}

impl<M: Send + 'static> StateDefinition<M> {
    /// Create an empty (terminal) definition.
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Bind an asynchronous transition function to `action`.
    ///
    /// Rebinding an action replaces the previous function.
    pub fn on<F, Fut>(mut self, action: impl Into<ActionName>, f: F) -> Self
    where
        F: Fn(Option<M>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<StateName>, BoxError>> + Send + 'static,
    {
        let f: TransitionFn<M> = Arc::new(move |meta: Option<M>| f(meta).boxed());
        self.actions.insert(action.into(), f);
        self
    }

    /// Bind a synchronous transition function to `action`.
    pub fn on_sync<F>(mut self, action: impl Into<ActionName>, f: F) -> Self
    where
        F: Fn(Option<M>) -> Result<Option<StateName>, BoxError> + Send + Sync + 'static,
    {
        let f: TransitionFn<M> =
            Arc::new(move |meta: Option<M>| futures::future::ready(f(meta)).boxed());
        self.actions.insert(action.into(), f);
        self
    }

    /// Bind `action` to an unconditional move to `target`.
    pub fn goto(self, action: impl Into<ActionName>, target: impl Into<StateName>) -> Self {
        let target = target.into();
        self.on_sync(action, move |_| Ok(Some(target.clone())))
    }

    /// Bind a pre-built transition function.
    pub fn with_fn(mut self, action: impl Into<ActionName>, f: TransitionFn<M>) -> Self {
        self.actions.insert(action.into(), f);
        self
    }
}

impl<M> StateDefinition<M> {
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    pub fn is_terminal(&self) -> bool {
        self.actions.is_empty()
    }

    /// Action names declared by this state, in sorted order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn transition_fn(&self, action: &str) -> Option<&TransitionFn<M>> {
        self.actions.get(action)
    }
}

impl<M: Send + 'static> Default for StateDefinition<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for StateDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<M> std::fmt::Debug for StateDefinition<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}

/// Complete machine description: state name to state definition.
///
/// # Example
///
/// ```rust
/// use statewire::core::{MachineConfig, StateDefinition};
///
/// let config: MachineConfig = MachineConfig::new()
///     .state("off", StateDefinition::new().goto("switchOn", "on"))
///     .state("on", StateDefinition::new().goto("switchOff", "off"));
///
/// assert_eq!(config.len(), 2);
/// assert_eq!(config.action_names(), vec!["switchOff", "switchOn"]);
/// ```
pub struct MachineConfig<M = serde_json::Value> {
    states: BTreeMap<StateName, StateDefinition<M>>,
}

impl<M> MachineConfig<M> {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }

    /// Declare a state. Declaring the same name twice replaces the definition.
    pub fn state(mut self, name: impl Into<StateName>, definition: StateDefinition<M>) -> Self {
        self.states.insert(name.into(), definition);
        self
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    pub fn get(&self, state: &str) -> Option<&StateDefinition<M>> {
        self.states.get(state)
    }

    /// All declared states, in sorted order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &StateDefinition<M>)> {
        self.states.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Every distinct action name declared by any state, sorted.
    pub fn action_names(&self) -> Vec<&str> {
        self.states
            .values()
            .flat_map(|def| def.action_names())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Look up the function for `action` while in `state`.
    pub fn transition_fn(&self, state: &str, action: &str) -> Option<&TransitionFn<M>> {
        self.states.get(state)?.transition_fn(action)
    }
}

impl<M> Default for MachineConfig<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for MachineConfig<M> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
        }
    }
}

impl<M> std::fmt::Debug for MachineConfig<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.states.iter()).finish()
    }
}

impl<M, N: Into<StateName>> FromIterator<(N, StateDefinition<M>)> for MachineConfig<M> {
    fn from_iter<I: IntoIterator<Item = (N, StateDefinition<M>)>>(iter: I) -> Self {
        Self {
            states: iter
                .into_iter()
                .map(|(name, def)| (name.into(), def))
                .collect(),
        }
    }
}
