//! Core machine data types.
//!
//! This module contains the pure data side of the machine:
//! - The declarative configuration (`MachineConfig`, `StateDefinition`)
//! - Notification payloads (`ExitEvent`, `EnterEvent`)
//! - Immutable history of committed transitions
//!
//! Nothing in this module performs I/O or holds mutable state.

mod config;
mod event;
mod history;

pub use config::{
    ActionName, BoxError, MachineConfig, Metadata, StateDefinition, StateName, TransitionFn,
};
pub use event::{EnterEvent, ExitEvent, MachineEvent};
pub use history::{StateHistory, StateTransition};
