//! Accumulating checks for automaton records.
//!
//! Loading a record that was edited by hand or written by another version
//! can go wrong in many places at once. Rather than stopping at the first
//! problem, [`validate_automate_record`] runs every check and reports all
//! violations together.

use crate::storage::records::{AutomateRecord, StateRecord};
use crate::storage::registry::{CallbackRegistry, TriggerRegistry};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One problem found in an automaton record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordViolation {
    #[error("State '{name}' is listed more than once")]
    DuplicateState { name: String },

    #[error("Error state '{name}' differs from the state listed under the same name")]
    ConflictingErrorState { name: String },

    #[error("Start state '{name}' is not a known state")]
    UnknownStartState { name: String },

    #[error("End state '{name}' is not a known state")]
    UnknownEndState { name: String },

    #[error("Transition source '{name}' is not a known state")]
    UnknownSourceState { name: String },

    #[error("Transition from '{source_state}' targets unknown state '{name}'")]
    UnknownTargetState { source_state: String, name: String },

    #[error("Trigger tag '{tag}' has no registered reconstructor")]
    UnknownTriggerTag { tag: String },

    #[error("State '{state}' refers to unregistered callback '{name}'")]
    UnknownCallback { state: String, name: String },
}

type Check = Validation<(), NonEmptyVec<RecordViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> RecordViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Check every reference in `record` against itself and the registries.
///
/// Returns `Validation::Success(())` if the record can be loaded.
/// Returns `Validation::Failure` with ALL violations otherwise.
pub fn validate_automate_record(
    record: &AutomateRecord,
    triggers: &TriggerRegistry,
    callbacks: &CallbackRegistry,
) -> Validation<(), NonEmptyVec<RecordViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    let mut known: HashSet<&str> = HashSet::new();
    for state in &record.states {
        checks.push(check(known.insert(state.name.as_str()), || {
            RecordViolation::DuplicateState {
                name: state.name.clone(),
            }
        }));
    }

    let error_state = &record.error_state;
    let listed_error = record.states.iter().find(|s| s.name == error_state.name);
    checks.push(check(
        listed_error.map_or(true, |listed| listed == error_state),
        || RecordViolation::ConflictingErrorState {
            name: error_state.name.clone(),
        },
    ));
    known.insert(error_state.name.as_str());

    checks.push(check(known.contains(record.start_state_name.as_str()), || {
        RecordViolation::UnknownStartState {
            name: record.start_state_name.clone(),
        }
    }));

    for name in &record.end_state_names {
        checks.push(check(known.contains(name.as_str()), || {
            RecordViolation::UnknownEndState { name: name.clone() }
        }));
    }

    for transition in &record.transitions {
        let source = &transition.source_state_name;
        checks.push(check(known.contains(source.as_str()), || {
            RecordViolation::UnknownSourceState {
                name: source.clone(),
            }
        }));

        let tag = &transition.trigger.tag;
        checks.push(check(triggers.contains(tag), || {
            RecordViolation::UnknownTriggerTag { tag: tag.clone() }
        }));

        for target in &transition.target_state_names {
            checks.push(check(known.contains(target.as_str()), || {
                RecordViolation::UnknownTargetState {
                    source_state: source.clone(),
                    name: target.clone(),
                }
            }));
        }
    }

    for state in record.states.iter().chain(std::iter::once(error_state)) {
        checks.extend(callback_checks(state, callbacks));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn callback_checks<'a>(
    state: &'a StateRecord,
    callbacks: &'a CallbackRegistry,
) -> impl Iterator<Item = Check> + 'a {
    state.callback_names().map(move |name| {
        check(callbacks.contains(name), || RecordViolation::UnknownCallback {
            state: state.name.clone(),
            name: name.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Callback;
    use crate::storage::records::{TransitionRecord, TriggerRecord};

    fn text(payload: &str) -> TriggerRecord {
        TriggerRecord {
            tag: "text".to_string(),
            payload: payload.to_string(),
        }
    }

    fn transition(source: &str, trigger: TriggerRecord, targets: &[&str]) -> TransitionRecord {
        TransitionRecord {
            source_state_name: source.to_string(),
            trigger,
            target_state_names: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn parity() -> AutomateRecord {
        AutomateRecord {
            states: vec![StateRecord::named("nonPair"), StateRecord::named("pair")],
            transitions: vec![
                transition("nonPair", text("1"), &["pair"]),
                transition("pair", text("1"), &["nonPair"]),
            ],
            start_state_name: "pair".to_string(),
            error_state: StateRecord::named("error"),
            end_state_names: vec!["pair".to_string()],
        }
    }

    #[test]
    fn valid_record_passes() {
        let result = validate_automate_record(
            &parity(),
            &TriggerRegistry::new(),
            &CallbackRegistry::new(),
        );

        assert!(result.is_success());
    }

    #[test]
    fn error_state_may_be_listed_with_states() {
        let mut record = parity();
        record.states.push(StateRecord::named("error"));

        let result = validate_automate_record(&record, &TriggerRegistry::new(), &CallbackRegistry::new());

        assert!(result.is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let mut record = parity();
        record.states.push(StateRecord::named("pair"));
        record.start_state_name = "begin".to_string();
        record.end_state_names.push("done".to_string());
        record.transitions.push(transition(
            "ghost",
            TriggerRecord {
                tag: "digit".to_string(),
                payload: "1".to_string(),
            },
            &["pair", "nowhere"],
        ));
        record.error_state.callback_name = "alarm".to_string();

        let result = validate_automate_record(&record, &TriggerRegistry::new(), &CallbackRegistry::new());

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 7);

                let expected = [
                    RecordViolation::DuplicateState {
                        name: "pair".to_string(),
                    },
                    RecordViolation::UnknownStartState {
                        name: "begin".to_string(),
                    },
                    RecordViolation::UnknownEndState {
                        name: "done".to_string(),
                    },
                    RecordViolation::UnknownSourceState {
                        name: "ghost".to_string(),
                    },
                    RecordViolation::UnknownTriggerTag {
                        tag: "digit".to_string(),
                    },
                    RecordViolation::UnknownTargetState {
                        source_state: "ghost".to_string(),
                        name: "nowhere".to_string(),
                    },
                    RecordViolation::UnknownCallback {
                        state: "error".to_string(),
                        name: "alarm".to_string(),
                    },
                ];
                for violation in &expected {
                    assert!(errors.iter().any(|e| e == violation), "missing {violation}");
                }
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn registered_callbacks_pass() {
        let mut record = parity();
        record.states[0].callback_name = "log".to_string();
        record.states[1].exit_callback = Some("log".to_string());
        let mut callbacks = CallbackRegistry::new();
        callbacks.register(Callback::new("log", || {})).unwrap();

        let result = validate_automate_record(&record, &TriggerRegistry::new(), &callbacks);

        assert!(result.is_success());
    }

    #[test]
    fn conflicting_error_state_is_reported() {
        let mut record = parity();
        let mut listed = StateRecord::named("error");
        listed.stay_callback = Some("none".to_string());
        record.states.push(listed);

        let result = validate_automate_record(&record, &TriggerRegistry::new(), &CallbackRegistry::new());

        if let Validation::Failure(errors) = result {
            assert!(errors
                .iter()
                .any(|e| matches!(e, RecordViolation::ConflictingErrorState { name } if name == "error")));
        } else {
            panic!("Expected failures, got success");
        }
    }
}
