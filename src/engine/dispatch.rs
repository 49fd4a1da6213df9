//! One callable entry point per distinct action name.

use crate::core::{ActionName, Metadata, StateName};
use crate::engine::error::MachineError;
use crate::engine::machine::Engine;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callable bound to a single action name.
///
/// Every distinct action declared anywhere in the configuration gets one,
/// regardless of which state is current; calling it from a state that does
/// not declare the action is a no-op resolving to `Ok(None)`.
pub struct Action<M> {
    name: ActionName,
    engine: Arc<Engine<M>>,
}

impl<M: Metadata> Action<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the transition protocol for this action.
    ///
    /// Resolves to the new current state, or `None` when the action is not
    /// legal from the state current at call time.
    pub async fn call(&self, meta: Option<M>) -> Result<Option<StateName>, MachineError> {
        self.engine.transition(&self.name, meta).await
    }

    /// Whether the action is legal from the current state right now.
    pub fn is_available(&self) -> bool {
        self.engine.is_legal(&self.name)
    }
}

impl<M> Clone for Action<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<M> fmt::Debug for Action<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

/// Lookup table of [`Action`]s, built once at construction.
pub struct ActionTable<M> {
    actions: BTreeMap<ActionName, Action<M>>,
}

impl<M: Metadata> ActionTable<M> {
    pub(crate) fn build(engine: &Arc<Engine<M>>) -> Self {
        let actions = engine
            .config()
            .action_names()
            .into_iter()
            .map(|name| {
                let action = Action {
                    name: name.to_string(),
                    engine: Arc::clone(engine),
                };
                (name.to_string(), action)
            })
            .collect();
        Self { actions }
    }

    pub fn get(&self, name: &str) -> Option<&Action<M>> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action<M>> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<M> fmt::Debug for ActionTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}
