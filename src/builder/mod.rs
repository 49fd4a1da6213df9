//! Construction entry points.
//!
//! [`create_machine`] takes a configuration plus [`MachineOptions`];
//! [`MachineBuilder`] is the fluent equivalent. Both validate the
//! configuration before any machine exists.

pub mod machine;
pub mod options;

pub use machine::MachineBuilder;
pub use options::MachineOptions;

use crate::core::{MachineConfig, Metadata};
use crate::engine::MachineHandle;
use crate::validation::ConfigError;

/// Build a machine from a configuration and options.
///
/// # Example
///
/// ```
/// use statewire::builder::{create_machine, MachineOptions};
/// use statewire::core::{MachineConfig, StateDefinition};
///
/// let config: MachineConfig = MachineConfig::new()
///     .state("idle", StateDefinition::new().goto("start", "active"))
///     .state("active", StateDefinition::new());
///
/// let machine = create_machine(config, MachineOptions::new("idle")).unwrap();
/// assert_eq!(machine.state(), "idle");
/// ```
pub fn create_machine<M: Metadata>(
    config: MachineConfig<M>,
    options: MachineOptions<M>,
) -> Result<MachineHandle<M>, ConfigError> {
    MachineBuilder::new(config).options(options).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateDefinition;
    use crate::validation::ConfigViolation;

    #[test]
    fn create_machine_starts_in_initial_state() {
        let config: MachineConfig = MachineConfig::new()
            .state("idle", StateDefinition::new().goto("start", "active"))
            .state("active", StateDefinition::new());

        let machine = create_machine(config, MachineOptions::new("active")).unwrap();

        assert_eq!(machine.state(), "active");
        assert!(machine.available_actions().is_empty());
    }

    #[test]
    fn create_machine_rejects_unknown_initial_state() {
        let config: MachineConfig =
            MachineConfig::new().state("idle", StateDefinition::new().goto("start", "idle"));

        let err = create_machine(config, MachineOptions::new("busy")).unwrap_err();

        assert!(err.contains(|v| matches!(
            v,
            ConfigViolation::UnknownInitialState { initial, .. } if initial == "busy"
        )));
    }
}
