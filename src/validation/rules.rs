//! Construction-time checks over a machine configuration.

use crate::core::MachineConfig;
use crate::engine::notifier_name;
use crate::validation::violations::{ConfigError, ConfigViolation};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one check; failures accumulate instead of stopping at the first.
pub type ConfigValidation = Validation<(), NonEmptyVec<ConfigViolation>>;

/// The configuration declares at least one state.
pub fn check_not_empty<M>(config: &MachineConfig<M>) -> ConfigValidation {
    if config.is_empty() {
        Validation::fail(ConfigViolation::EmptyConfig)
    } else {
        Validation::success(())
    }
}

/// The initial state was supplied and is a declared state.
pub fn check_initial_state<M>(config: &MachineConfig<M>, initial: Option<&str>) -> ConfigValidation {
    match initial {
        None => Validation::fail(ConfigViolation::MissingInitialState),
        Some(initial) if config.contains_state(initial) => Validation::success(()),
        Some(initial) => Validation::fail(ConfigViolation::UnknownInitialState {
            initial: initial.to_string(),
            known: config.state_names().map(str::to_string).collect(),
        }),
    }
}

/// No action name shadows a state name or a per-state subscription name.
pub fn check_action_names<M>(config: &MachineConfig<M>) -> ConfigValidation {
    let notifiers: HashMap<String, &str> = config
        .state_names()
        .map(|state| (notifier_name(state), state))
        .collect();

    let mut checks: Vec<ConfigValidation> = Vec::new();
    for action in config.action_names() {
        if config.contains_state(action) {
            checks.push(Validation::fail(ConfigViolation::ActionCollidesWithState {
                action: action.to_string(),
            }));
        }
        if let Some(state) = notifiers.get(action) {
            checks.push(Validation::fail(ConfigViolation::ActionCollidesWithNotifier {
                action: action.to_string(),
                state: state.to_string(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// No two states generate the same subscription name (`idle` and `Idle`).
pub fn check_notifier_names<M>(config: &MachineConfig<M>) -> ConfigValidation {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut checks: Vec<ConfigValidation> = Vec::new();

    for state in config.state_names() {
        let name = notifier_name(state);
        match seen.get(&name) {
            Some(first) => checks.push(Validation::fail(ConfigViolation::NotifierCollision {
                name,
                first: first.to_string(),
                second: state.to_string(),
            })),
            None => {
                seen.insert(name, state);
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Run every check, collecting all violations.
pub fn validate_config<M>(config: &MachineConfig<M>, initial: Option<&str>) -> Result<(), ConfigError> {
    let checks = vec![
        check_not_empty(config),
        check_initial_state(config, initial),
        check_action_names(config),
        check_notifier_names(config),
    ];

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(ConfigError::new(errors.iter().cloned().collect())),
    }
}
