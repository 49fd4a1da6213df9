//! One subscription entry point per declared state.

use crate::core::{EnterEvent, MachineEvent, Metadata, StateName};
use crate::emitter::{Emitter, Handler, Subscription};
use crate::engine::{enter_adapter, state_channel};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Subscription identifier generated for a state: `idle` becomes `onIdle`.
///
/// Only the first character is upper-cased; the rest is kept as written.
///
/// ```rust
/// use statewire::engine::notifier_name;
///
/// assert_eq!(notifier_name("idle"), "onIdle");
/// assert_eq!(notifier_name("waitingForAck"), "onWaitingForAck");
/// ```
pub fn notifier_name(state: &str) -> String {
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

/// Subscription entry point for one state's channel.
///
/// Handlers fire with the [`EnterEvent`] every time the state becomes
/// current, after the machine-wide enter handlers.
pub struct StateNotifier<M> {
    name: String,
    state: StateName,
    emitter: Arc<dyn Emitter<MachineEvent<M>>>,
}

impl<M: Metadata> StateNotifier<M> {
    /// The generated identifier, e.g. `onIdle`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn subscribe(&self, handler: Handler<EnterEvent<M>>) -> Subscription {
        let channel = state_channel(&self.state);
        let id = self.emitter.subscribe(&channel, enter_adapter(handler));
        Subscription::new(Arc::clone(&self.emitter), channel, id)
    }
}

impl<M> Clone for StateNotifier<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: self.state.clone(),
            emitter: Arc::clone(&self.emitter),
        }
    }
}

impl<M> fmt::Debug for StateNotifier<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNotifier")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}

/// Lookup table of [`StateNotifier`]s keyed by generated identifier.
pub struct NotifierTable<M> {
    notifiers: BTreeMap<String, StateNotifier<M>>,
}

impl<M: Metadata> NotifierTable<M> {
    pub(crate) fn build<'a>(
        states: impl Iterator<Item = &'a str>,
        emitter: &Arc<dyn Emitter<MachineEvent<M>>>,
    ) -> Self {
        let notifiers = states
            .map(|state| {
                let notifier = StateNotifier {
                    name: notifier_name(state),
                    state: state.to_string(),
                    emitter: Arc::clone(emitter),
                };
                (notifier.name.clone(), notifier)
            })
            .collect();
        Self { notifiers }
    }

    /// Look up by generated identifier (`onIdle`).
    pub fn get(&self, name: &str) -> Option<&StateNotifier<M>> {
        self.notifiers.get(name)
    }

    /// Look up by state name (`idle`).
    pub fn for_state(&self, state: &str) -> Option<&StateNotifier<M>> {
        self.notifiers
            .get(&notifier_name(state))
            .filter(|notifier| notifier.state == state)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.notifiers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl<M> fmt::Debug for NotifierTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.notifiers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{MachineConfig, StateDefinition};
    use crate::emitter::handler;
    use parking_lot::Mutex;

    fn machine_config() -> MachineConfig {
        MachineConfig::new()
            .state("idle", StateDefinition::new().goto("start", "active"))
            .state("active", StateDefinition::new().goto("stop", "idle"))
    }

    #[test]
    fn notifier_name_capitalizes_first_character() {
        assert_eq!(notifier_name("idle"), "onIdle");
        assert_eq!(notifier_name("Idle"), "onIdle");
        assert_eq!(notifier_name("élan"), "onÉlan");
        assert_eq!(notifier_name(""), "on");
    }

    #[test]
    fn table_has_one_entry_per_state() {
        let machine = MachineBuilder::new(machine_config())
            .initial_state("idle")
            .build()
            .unwrap();

        let names: Vec<_> = machine.notifiers().names().collect();
        assert_eq!(names, vec!["onActive", "onIdle"]);
        assert_eq!(machine.notifiers().for_state("idle").unwrap().name(), "onIdle");
    }

    #[tokio::test]
    async fn state_handler_fires_only_for_its_state() {
        let machine = MachineBuilder::new(machine_config())
            .initial_state("idle")
            .build()
            .unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = seen.clone();
        machine.notifier("onActive").unwrap().subscribe(handler(move |event: EnterEvent<_>| {
            let log = log.clone();
            async move {
                log.lock().push((event.last, event.current));
                Ok(())
            }
        }));

        machine.transition("start", None).await.unwrap();
        machine.transition("stop", None).await.unwrap();
        machine.transition("start", None).await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("idle".to_string(), "active".to_string()),
                ("idle".to_string(), "active".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unsubscribed_state_handler_stops_receiving() {
        let machine = MachineBuilder::new(machine_config())
            .initial_state("idle")
            .build()
            .unwrap();
        let seen = Arc::new(Mutex::new(0));

        let counter = seen.clone();
        let subscription = machine.notifier("onActive").unwrap().subscribe(handler(
            move |_: EnterEvent<_>| {
                let counter = counter.clone();
                async move {
                    *counter.lock() += 1;
                    Ok(())
                }
            },
        ));
        assert_eq!(subscription.channel(), state_channel("active"));

        machine.transition("start", None).await.unwrap();
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        machine.transition("stop", None).await.unwrap();
        machine.transition("start", None).await.unwrap();

        assert_eq!(*seen.lock(), 1);
        assert_eq!(machine.state(), "active");
    }
}
