//! Configuration violations and the error that carries them.

use thiserror::Error;

/// One problem found while validating a machine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Configuration declares no states")]
    EmptyConfig,

    #[error("Initial state not specified. Call .initial_state(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{initial}' is not declared (known states: {known:?})")]
    UnknownInitialState { initial: String, known: Vec<String> },

    #[error("Action '{action}' has the same name as a state")]
    ActionCollidesWithState { action: String },

    #[error("Action '{action}' has the same name as the subscription for state '{state}'")]
    ActionCollidesWithNotifier { action: String, state: String },

    #[error("States '{first}' and '{second}' share the subscription name '{name}'")]
    NotifierCollision {
        name: String,
        first: String,
        second: String,
    },
}

/// Construction failure: every violation found in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid machine configuration: {}", join_violations(.violations))]
pub struct ConfigError {
    violations: Vec<ConfigViolation>,
}

impl ConfigError {
    pub fn new(violations: Vec<ConfigViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }

    pub fn contains(&self, predicate: impl Fn(&ConfigViolation) -> bool) -> bool {
        self.violations.iter().any(predicate)
    }
}

impl From<ConfigViolation> for ConfigError {
    fn from(violation: ConfigViolation) -> Self {
        Self::new(vec![violation])
    }
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_violation() {
        let err = ConfigError::new(vec![
            ConfigViolation::EmptyConfig,
            ConfigViolation::MissingInitialState,
        ]);

        let message = err.to_string();
        assert!(message.starts_with("Invalid machine configuration: Configuration declares no states; "));
        assert!(message.contains("Initial state not specified"));
    }

    #[test]
    fn config_error_is_a_std_error() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            ConfigError::from(ConfigViolation::MissingInitialState).into();

        assert_eq!(
            err.to_string(),
            "Invalid machine configuration: Initial state not specified. \
             Call .initial_state(state) before .build()"
        );
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn single_violation_converts() {
        let err: ConfigError = ConfigViolation::EmptyConfig.into();
        assert_eq!(err.violations(), &[ConfigViolation::EmptyConfig]);
        assert!(err.contains(|v| matches!(v, ConfigViolation::EmptyConfig)));
    }
}
