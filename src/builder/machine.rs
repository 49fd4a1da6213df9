//! Builder for constructing state machines.

use crate::builder::options::MachineOptions;
use crate::core::{MachineConfig, MachineEvent, Metadata, StateName};
use crate::emitter::{ChannelEmitter, Emitter};
use crate::engine::{Engine, EngineSettings, ExitPolicy, MachineHandle};
use crate::validation::{validate_config, ConfigError};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
pub struct MachineBuilder<M = serde_json::Value> {
    config: MachineConfig<M>,
    options: MachineOptions<M>,
}

impl<M: Metadata> MachineBuilder<M> {
    /// Create a builder over a configuration.
    pub fn new(config: MachineConfig<M>) -> Self {
        Self {
            config,
            options: MachineOptions::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial_state(mut self, state: impl Into<StateName>) -> Self {
        self.options = self.options.initial_state(state);
        self
    }

    /// Inject a notification capability instead of the in-memory default.
    pub fn emitter(mut self, emitter: Arc<dyn Emitter<MachineEvent<M>>>) -> Self {
        self.options = self.options.emitter(emitter);
        self
    }

    /// Queue transitions so at most one runs at a time.
    pub fn serialized(mut self, serialized: bool) -> Self {
        self.options = self.options.serialized(serialized);
        self
    }

    pub fn track_history(mut self, track: bool) -> Self {
        self.options = self.options.track_history(track);
        self
    }

    pub fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.options = self.options.exit_policy(policy);
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: MachineOptions<M>) -> Self {
        self.options = options;
        self
    }

    /// Validate the configuration and build the machine.
    ///
    /// Returns every violation found, not only the first.
    pub fn build(self) -> Result<MachineHandle<M>, ConfigError> {
        let Self { config, options } = self;
        validate_config(&config, options.initial_state.as_deref())?;

        let initial = options.initial_state.unwrap_or_default();
        let emitter: Arc<dyn Emitter<MachineEvent<M>>> = match options.emitter {
            Some(emitter) => emitter,
            None => Arc::new(ChannelEmitter::new()),
        };

        let engine = Engine::new(
            config,
            initial,
            EngineSettings {
                emitter,
                serialized: options.serialized,
                track_history: options.track_history,
                exit_policy: options.exit_policy,
            },
        );
        Ok(MachineHandle::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnterEvent, StateDefinition};
    use crate::emitter::{handler, Handler, HandlerError, SubscriptionId};
    use crate::engine::{ENTER_CHANNEL, EXIT_CHANNEL};
    use crate::validation::ConfigViolation;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Emitter that logs every publish before delegating.
    #[derive(Default)]
    struct RecordingEmitter {
        inner: ChannelEmitter<MachineEvent>,
        published: Mutex<Vec<(String, MachineEvent)>>,
    }

    impl RecordingEmitter {
        fn channels(&self) -> Vec<String> {
            self.published
                .lock()
                .iter()
                .map(|(channel, _)| channel.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Emitter<MachineEvent> for RecordingEmitter {
        fn subscribe(&self, channel: &str, handler: Handler<MachineEvent>) -> SubscriptionId {
            self.inner.subscribe(channel, handler)
        }

        fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> bool {
            self.inner.unsubscribe(channel, id)
        }

        async fn publish(&self, channel: &str, payload: MachineEvent) -> Result<(), HandlerError> {
            self.published
                .lock()
                .push((channel.to_string(), payload.clone()));
            self.inner.publish(channel, payload).await
        }
    }

    fn switch_config() -> MachineConfig {
        MachineConfig::new()
            .state("off", StateDefinition::new().goto("switchOn", "on"))
            .state("on", StateDefinition::new().goto("switchOff", "off"))
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = MachineBuilder::new(switch_config()).build();

        let err = result.unwrap_err();
        assert_eq!(err.violations(), &[ConfigViolation::MissingInitialState]);
    }

    #[test]
    fn builder_rejects_empty_config() {
        let result = MachineBuilder::new(MachineConfig::<()>::new())
            .initial_state("anything")
            .build();

        let err = result.unwrap_err();
        assert!(err.contains(|v| matches!(v, ConfigViolation::EmptyConfig)));
        assert!(err.contains(|v| matches!(v, ConfigViolation::UnknownInitialState { .. })));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = MachineBuilder::new(switch_config())
            .initial_state("on")
            .track_history(true)
            .build()
            .unwrap();

        assert_eq!(machine.state(), "on");
        assert_eq!(machine.initial_state(), "on");
        assert!(machine.history().is_some_and(|h| h.is_empty()));
    }

    #[tokio::test]
    async fn injected_emitter_receives_machine_events() {
        let emitter = Arc::new(ChannelEmitter::<MachineEvent<serde_json::Value>>::new());
        let machine = MachineBuilder::new(switch_config())
            .initial_state("off")
            .emitter(emitter.clone())
            .build()
            .unwrap();

        let subscription =
            machine.on_enter(handler(|_: EnterEvent<serde_json::Value>| async { Ok(()) }));
        assert_eq!(emitter.handler_count(crate::engine::ENTER_CHANNEL), 1);

        subscription.unsubscribe();
        assert_eq!(emitter.handler_count(crate::engine::ENTER_CHANNEL), 0);
    }

    #[tokio::test]
    async fn transition_publishes_through_injected_emitter() {
        let emitter = Arc::new(RecordingEmitter::default());
        let machine = MachineBuilder::new(switch_config())
            .initial_state("off")
            .emitter(emitter.clone())
            .build()
            .unwrap();
        let delivered = Arc::new(Mutex::new(0));
        let counter = delivered.clone();
        machine.on_state(
            "on",
            handler(move |_: EnterEvent| {
                let counter = counter.clone();
                async move {
                    *counter.lock() += 1;
                    Ok(())
                }
            }),
        );

        machine.transition("switchOn", None).await.unwrap();

        assert_eq!(emitter.channels(), vec![EXIT_CHANNEL, ENTER_CHANNEL, "state:on"]);
        let published = emitter.published.lock();
        assert!(matches!(
            &published[0].1,
            MachineEvent::Exit(exit) if exit.current == "off" && exit.action == "switchOn"
        ));
        assert!(matches!(
            &published[1].1,
            MachineEvent::Enter(enter) if enter.last == "off" && enter.current == "on"
        ));
        assert_eq!(published[1].1, published[2].1);
        assert_eq!(*delivered.lock(), 1);
    }

    #[tokio::test]
    async fn illegal_action_publishes_only_exit_through_injected_emitter() {
        let emitter = Arc::new(RecordingEmitter::default());
        let machine = MachineBuilder::new(switch_config())
            .initial_state("off")
            .emitter(emitter.clone())
            .build()
            .unwrap();

        assert_eq!(machine.transition("switchOff", None).await.unwrap(), None);

        assert_eq!(emitter.channels(), vec![EXIT_CHANNEL]);
    }
}
