//! Builder for executions.

use crate::builder::error::BuildError;
use crate::core::Automate;
use crate::execution::{Execution, ExecutionConfiguration};
use std::sync::Arc;

/// Builder for constructing an [`Execution`] with a fluent API.
pub struct ExecutionBuilder {
    automate: Option<Arc<Automate>>,
    configuration: ExecutionConfiguration,
}

impl ExecutionBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            automate: None,
            configuration: ExecutionConfiguration::default(),
        }
    }

    /// Set the automaton to run (required).
    pub fn automate(mut self, automate: impl Into<Arc<Automate>>) -> Self {
        self.automate = Some(automate.into());
        self
    }

    pub fn configuration(mut self, configuration: ExecutionConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Build the execution, unstarted.
    pub fn build(self) -> Result<Execution, BuildError> {
        let automate = self.automate.ok_or(BuildError::MissingAutomate)?;
        Ok(Execution::new(automate, self.configuration))
    }
}

impl Default for ExecutionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AutomateBuilder;

    fn automate() -> Automate {
        let mut builder = AutomateBuilder::new();
        builder
            .add_state("start")
            .unwrap()
            .add_state("error")
            .unwrap()
            .set_start_state("start")
            .unwrap()
            .set_error_state("error")
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn builder_requires_automate() {
        let result = ExecutionBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingAutomate)));
    }

    #[test]
    fn builder_uses_default_configuration() {
        let execution = ExecutionBuilder::new().automate(automate()).build().unwrap();

        assert_eq!(execution.configuration(), &ExecutionConfiguration::default());
        assert!(!execution.is_started());
    }

    #[test]
    fn builder_accepts_shared_automate_and_configuration() {
        let shared = Arc::new(automate());
        let configuration = ExecutionConfiguration::default().with_exit_on_end_state_encountered(true);

        let execution = ExecutionBuilder::new()
            .automate(Arc::clone(&shared))
            .configuration(configuration)
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(execution.automate(), &shared));
        assert!(execution.configuration().exit_on_end_state_encountered);
    }
}
