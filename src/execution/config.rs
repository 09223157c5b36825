//! Step policy for executions.

use serde::{Deserialize, Serialize};

/// Three independent flags controlling how `update` treats undefined,
/// nondeterministic and accepting steps.
///
/// Missing fields deserialize to their defaults.
///
/// # Example
///
/// ```rust
/// use automate::execution::ExecutionConfiguration;
///
/// let configuration = ExecutionConfiguration::default()
///     .with_allow_stay_on_undefined_transition(true);
///
/// assert!(configuration.allow_multiple_target_states);
/// assert!(configuration.allow_stay_on_undefined_transition);
/// assert!(!configuration.exit_on_end_state_encountered);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfiguration {
    /// Branch into every target when a step resolves to several states.
    /// When false such a step sends the source to the error state.
    pub allow_multiple_target_states: bool,

    /// Keep the source state (firing its stay hook) when no transition
    /// matches. When false the source moves to the error state.
    pub allow_stay_on_undefined_transition: bool,

    /// Report the run as finished once any end state has been seen.
    pub exit_on_end_state_encountered: bool,
}

impl Default for ExecutionConfiguration {
    fn default() -> Self {
        Self {
            allow_multiple_target_states: true,
            allow_stay_on_undefined_transition: false,
            exit_on_end_state_encountered: false,
        }
    }
}

impl ExecutionConfiguration {
    pub fn with_allow_multiple_target_states(mut self, allow: bool) -> Self {
        self.allow_multiple_target_states = allow;
        self
    }

    pub fn with_allow_stay_on_undefined_transition(mut self, allow: bool) -> Self {
        self.allow_stay_on_undefined_transition = allow;
        self
    }

    pub fn with_exit_on_end_state_encountered(mut self, exit: bool) -> Self {
        self.exit_on_end_state_encountered = exit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let configuration = ExecutionConfiguration::default();

        assert!(configuration.allow_multiple_target_states);
        assert!(!configuration.allow_stay_on_undefined_transition);
        assert!(!configuration.exit_on_end_state_encountered);
    }

    #[test]
    fn setters_are_independent() {
        let configuration = ExecutionConfiguration::default()
            .with_allow_multiple_target_states(false)
            .with_exit_on_end_state_encountered(true);

        assert!(!configuration.allow_multiple_target_states);
        assert!(!configuration.allow_stay_on_undefined_transition);
        assert!(configuration.exit_on_end_state_encountered);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let configuration: ExecutionConfiguration =
            serde_json::from_str(r#"{"exit_on_end_state_encountered": true}"#).unwrap();

        assert!(configuration.allow_multiple_target_states);
        assert!(!configuration.allow_stay_on_undefined_transition);
        assert!(configuration.exit_on_end_state_encountered);
    }

    #[test]
    fn configuration_serializes_correctly() {
        let configuration = ExecutionConfiguration::default().with_allow_stay_on_undefined_transition(true);
        let json = serde_json::to_string(&configuration).unwrap();
        let deserialized: ExecutionConfiguration = serde_json::from_str(&json).unwrap();

        assert_eq!(configuration, deserialized);
    }
}
