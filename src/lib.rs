//! Statewire: a declarative async state machine with lifecycle notifications
//!
//! A machine is described as a table of states, each mapping action names to
//! functions that compute the successor state. Statewire turns that table
//! into a live machine that owns the current state and announces every
//! transition through an injectable publish/subscribe capability.
//!
//! # Core Concepts
//!
//! - **Configuration**: `MachineConfig` and `StateDefinition`, pure data
//! - **Engine**: `MachineHandle`, running exit -> compute -> enter per call
//! - **Dispatch table**: one `Action` per distinct action name
//! - **Notifiers**: one `onState` subscription entry point per state
//! - **Emitter**: the `Emitter` trait, with `ChannelEmitter` as default
//!
//! # Example
//!
//! ```rust
//! use statewire::builder::MachineBuilder;
//! use statewire::core::{EnterEvent, MachineConfig, StateDefinition};
//! use statewire::emitter::handler;
//!
//! # futures::executor::block_on(async {
//! let config: MachineConfig = MachineConfig::new()
//!     .state("off", StateDefinition::new().goto("switchOn", "on"))
//!     .state("on", StateDefinition::new().goto("switchOff", "off"));
//!
//! let machine = MachineBuilder::new(config)
//!     .initial_state("off")
//!     .build()
//!     .unwrap();
//!
//! let subscription = machine
//!     .notifier("onOn")
//!     .unwrap()
//!     .subscribe(handler(|event: EnterEvent| async move {
//!         println!("{} -> {}", event.last, event.current);
//!         Ok(())
//!     }));
//!
//! let state = machine.action("switchOn").unwrap().call(None).await.unwrap();
//! assert_eq!(state.as_deref(), Some("on"));
//!
//! // Not declared under "on": a no-op.
//! assert_eq!(machine.transition("switchOn", None).await.unwrap(), None);
//! assert_eq!(machine.state(), "on");
//!
//! subscription.unsubscribe();
//! # });
//! ```

pub mod builder;
pub mod core;
pub mod emitter;
pub mod engine;
pub mod validation;

// Re-export commonly used types
pub use builder::{create_machine, MachineBuilder, MachineOptions};
pub use core::{EnterEvent, ExitEvent, MachineConfig, StateDefinition};
pub use emitter::{handler, ChannelEmitter, Emitter, Subscription};
pub use engine::{MachineError, MachineHandle};
pub use validation::ConfigError;
