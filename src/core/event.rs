//! Lifecycle notification payloads.

use super::config::{ActionName, StateName};
use serde::{Deserialize, Serialize};

/// Published before a transition attempt, describing the state being left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitEvent<M = serde_json::Value> {
    pub action: ActionName,
    /// State current when the attempt started
    pub current: StateName,
    pub meta: Option<M>,
}

/// Published after a commit, on the machine-wide enter channel and then on
/// the channel of the entered state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnterEvent<M = serde_json::Value> {
    pub action: ActionName,
    /// State assigned at commit
    pub current: StateName,
    /// State held immediately before the commit
    pub last: StateName,
    pub meta: Option<M>,
}

/// Payload carried on every machine channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MachineEvent<M = serde_json::Value> {
    Exit(ExitEvent<M>),
    Enter(EnterEvent<M>),
}

impl<M> MachineEvent<M> {
    pub fn action(&self) -> &str {
        match self {
            Self::Exit(event) => &event.action,
            Self::Enter(event) => &event.action,
        }
    }

    /// The current state as described by the event.
    pub fn current(&self) -> &str {
        match self {
            Self::Exit(event) => &event.current,
            Self::Enter(event) => &event.current,
        }
    }
}
