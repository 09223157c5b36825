//! Saving and restoring automata and executions.
//!
//! This module turns live automata and executions into plain records and
//! back, so long-running executions can survive a process restart. Hooks
//! and custom triggers are not serializable; records store their names and
//! tags, and the host supplies a [`CallbackRegistry`] and a
//! [`TriggerRegistry`] to resolve them on load.
//!
//! Loading never builds an automaton directly. A record is first checked
//! with [`validate_automate_record`], which reports every problem at once,
//! and then replayed through [`AutomateBuilder`] so the usual invariants
//! hold for restored automata too.
//!
//! # Example
//!
//! ```rust
//! use automate::automate;
//! use automate::execution::{Execution, ExecutionConfiguration};
//! use automate::storage::{CallbackRegistry, Storage, TriggerRegistry};
//!
//! let automate = automate! {
//!     states: ["pair", "nonPair", "error"],
//!     start: "pair",
//!     error: "error",
//!     transitions: [
//!         ("pair", "1") => ["nonPair"],
//!         ("nonPair", "1") => ["pair"],
//!     ],
//! }
//! .unwrap();
//!
//! let mut execution = Execution::new(automate.into(), ExecutionConfiguration::default());
//! execution.start();
//! execution.update("1").unwrap();
//!
//! let storage = Storage::new(TriggerRegistry::new(), CallbackRegistry::new());
//! let json = storage.execution_to_json(&execution).unwrap();
//! let restored = storage.execution_from_json(&json).unwrap();
//!
//! assert_eq!(restored.id(), execution.id());
//! assert_eq!(restored.current_state_names(), vec!["nonPair"]);
//! ```

mod error;
mod records;
mod registry;
mod validate;

pub use error::StorageError;
pub use records::{
    AutomateRecord, ExecutionRecord, StateRecord, TransitionRecord, TriggerRecord, NO_CALLBACK,
    RECORD_VERSION,
};
pub use registry::{CallbackRegistry, TriggerReconstructor, TriggerRegistry};
pub use validate::{validate_automate_record, RecordViolation};

use crate::builder::AutomateBuilder;
use crate::core::{Automate, Callback, EndStateHistory, State, StateSet};
use crate::execution::Execution;
use chrono::Utc;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Converts between live values and records using the host's registries.
#[derive(Clone, Debug, Default)]
pub struct Storage {
    triggers: TriggerRegistry,
    callbacks: CallbackRegistry,
}

impl Storage {
    pub fn new(triggers: TriggerRegistry, callbacks: CallbackRegistry) -> Self {
        Self {
            triggers,
            callbacks,
        }
    }

    pub fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.triggers
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.callbacks
    }

    /// Describe `automate` as a record.
    ///
    /// States are taken from the transition table plus the start and error
    /// states. End names that refer to none of those are dropped since no
    /// execution can reach them.
    pub fn automate_to_record(&self, automate: &Automate) -> AutomateRecord {
        let states = automate.states();
        let end_state_names = automate
            .end_state_names()
            .iter()
            .filter(|name| states.iter().any(|state| state.name() == name.as_str()))
            .cloned()
            .collect();

        AutomateRecord {
            states: states.iter().map(|state| state_record(state)).collect(),
            transitions: TransitionRecord::from_table(automate.transition_table()),
            start_state_name: automate.start_state().name().to_string(),
            error_state: state_record(automate.error_state()),
            end_state_names,
        }
    }

    /// Rebuild an automaton from `record`.
    ///
    /// # Errors
    ///
    /// [`StorageError::InvalidRecord`] with every violation if the record
    /// does not validate. Otherwise the first registry or builder failure.
    pub fn load_automate(&self, record: &AutomateRecord) -> Result<Automate, StorageError> {
        if let Validation::Failure(errors) =
            validate_automate_record(record, &self.triggers, &self.callbacks)
        {
            return Err(StorageError::InvalidRecord(errors.iter().cloned().collect()));
        }

        let mut builder = AutomateBuilder::new();
        for state in &record.states {
            builder.add_state(self.state_from_record(state)?)?;
        }
        if !builder.has_state(&record.error_state.name) {
            builder.add_state(self.state_from_record(&record.error_state)?)?;
        }
        for name in &record.end_state_names {
            builder.add_end_state(name)?;
        }
        for transition in &record.transitions {
            let trigger = self.triggers.resolve(&transition.trigger)?;
            builder.add_transition(
                &transition.source_state_name,
                trigger,
                &transition.target_state_names,
            )?;
        }
        builder
            .set_start_state(&record.start_state_name)?
            .set_error_state(&record.error_state.name)?;

        let automate = builder.build()?;
        tracing::debug!(
            states = record.states.len(),
            transitions = record.transitions.len(),
            "loaded automate"
        );
        Ok(automate)
    }

    /// Snapshot `execution`, including its automaton.
    pub fn execution_to_record(&self, execution: &Execution) -> ExecutionRecord {
        ExecutionRecord {
            version: RECORD_VERSION,
            id: execution.id(),
            saved_at: Utc::now(),
            automate: self.automate_to_record(execution.automate()),
            current_state_names: names(execution.current_states()),
            encountered_end_state_name_sets: execution
                .encountered_end_states()
                .snapshots()
                .iter()
                .map(names)
                .collect(),
            configuration: *execution.configuration(),
        }
    }

    /// Restore an execution with its id, current states and end-state
    /// history. No hooks fire while restoring.
    pub fn load_execution(&self, record: &ExecutionRecord) -> Result<Execution, StorageError> {
        if record.version != RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: record.version,
                supported: RECORD_VERSION,
            });
        }

        let automate = self.load_automate(&record.automate)?;
        let current_states = resolve_states(&automate, &record.current_state_names)?;
        let mut history = EndStateHistory::new();
        for snapshot in &record.encountered_end_state_name_sets {
            history.record(resolve_states(&automate, snapshot)?);
        }

        tracing::debug!(
            execution = %record.id,
            saved_at = %record.saved_at,
            current = current_states.len(),
            "loaded execution"
        );

        Ok(Execution::restore(
            record.id,
            Arc::new(automate),
            record.configuration,
            current_states,
            history,
        ))
    }

    pub fn automate_to_json(&self, automate: &Automate) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&self.automate_to_record(automate))?)
    }

    pub fn automate_from_json(&self, json: &str) -> Result<Automate, StorageError> {
        let record: AutomateRecord = serde_json::from_str(json)?;
        self.load_automate(&record)
    }

    pub fn execution_to_json(&self, execution: &Execution) -> Result<String, StorageError> {
        let record = self.execution_to_record(execution);
        tracing::debug!(execution = %record.id, "saving execution as json");
        Ok(serde_json::to_string_pretty(&record)?)
    }

    pub fn execution_from_json(&self, json: &str) -> Result<Execution, StorageError> {
        let record: ExecutionRecord = serde_json::from_str(json)?;
        self.load_execution(&record)
    }

    /// Compact binary form of [`execution_to_record`](Self::execution_to_record).
    pub fn execution_to_bytes(&self, execution: &Execution) -> Result<Vec<u8>, StorageError> {
        let record = self.execution_to_record(execution);
        tracing::debug!(execution = %record.id, "saving execution as binary");
        Ok(bincode::serialize(&record)?)
    }

    pub fn execution_from_bytes(&self, bytes: &[u8]) -> Result<Execution, StorageError> {
        let record: ExecutionRecord = bincode::deserialize(bytes)?;
        self.load_execution(&record)
    }

    fn state_from_record(&self, record: &StateRecord) -> Result<State, StorageError> {
        Ok(State::with_hooks(
            record.name.as_str(),
            self.callbacks.resolve(&record.callback_name)?,
            self.callbacks
                .resolve_optional(record.exit_callback.as_deref())?,
            self.callbacks
                .resolve_optional(record.stay_callback.as_deref())?,
        ))
    }
}

fn state_record(state: &State) -> StateRecord {
    let hook_name = |callback: Option<Callback>| {
        callback.map(|callback| callback.name().to_string())
    };

    StateRecord {
        name: state.name().to_string(),
        callback_name: hook_name(state.on_entry()).unwrap_or_else(|| NO_CALLBACK.to_string()),
        exit_callback: hook_name(state.on_exit()),
        stay_callback: hook_name(state.on_stay()),
    }
}

fn names(states: &StateSet) -> Vec<String> {
    states.iter().map(|state| state.name().to_string()).collect()
}

fn resolve_states(automate: &Automate, names: &[String]) -> Result<StateSet, StorageError> {
    let known = automate.states();
    names
        .iter()
        .map(|name| {
            known
                .iter()
                .find(|state| state.name() == name.as_str())
                .map(Arc::clone)
                .ok_or_else(|| StorageError::UnknownState { name: name.clone() })
        })
        .collect()
}
