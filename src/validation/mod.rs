//! Construction-time validation of machine configurations.
//!
//! Every check returns a Stillwater `Validation`, so a single pass reports
//! ALL problems with a configuration instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use statewire::core::{MachineConfig, StateDefinition};
//! use statewire::validation::{validate_config, ConfigViolation};
//!
//! let config: MachineConfig = MachineConfig::new()
//!     .state("idle", StateDefinition::new().goto("active", "active"))
//!     .state("active", StateDefinition::new());
//!
//! let err = validate_config(&config, Some("missing")).unwrap_err();
//! assert_eq!(err.violations().len(), 2);
//! assert!(err.contains(|v| matches!(v, ConfigViolation::ActionCollidesWithState { .. })));
//! ```

pub mod rules;
pub mod violations;

pub use rules::{
    check_action_names, check_initial_state, check_not_empty, check_notifier_names, validate_config,
    ConfigValidation,
};
pub use violations::{ConfigError, ConfigViolation};
