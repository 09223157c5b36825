//! Serializable forms of automata and executions.
//!
//! Records hold names only. Callbacks are stored by name and triggers by
//! tag and payload; the registries turn them back into live values on load.

use crate::core::{Trigger, TransitionKey, TransitionTable};
use crate::execution::ExecutionConfiguration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Callback name stored for a state without an entry hook.
pub const NO_CALLBACK: &str = "none";

/// Version identifier for the record format
pub const RECORD_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,

    /// Entry hook name, or `"none"`.
    pub callback_name: String,

    #[serde(default)]
    pub exit_callback: Option<String>,

    #[serde(default)]
    pub stay_callback: Option<String>,
}

impl StateRecord {
    /// A state record with no hooks.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            callback_name: NO_CALLBACK.to_string(),
            exit_callback: None,
            stay_callback: None,
        }
    }

    /// Every hook name the record refers to, `"none"` excluded.
    pub fn callback_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.callback_name.as_str())
            .filter(|name| *name != NO_CALLBACK)
            .chain(self.exit_callback.as_deref())
            .chain(self.stay_callback.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub tag: String,
    pub payload: String,
}

impl From<&Trigger> for TriggerRecord {
    fn from(trigger: &Trigger) -> Self {
        Self {
            tag: trigger.tag().to_string(),
            payload: trigger.payload(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub source_state_name: String,
    pub trigger: TriggerRecord,
    pub target_state_names: Vec<String>,
}

impl TransitionRecord {
    pub(crate) fn from_table(table: &TransitionTable) -> Vec<Self> {
        let mut records: Vec<Self> = table
            .transitions()
            .map(|(key, targets)| Self::from_entry(key, targets.iter().map(|t| t.name())))
            .collect();
        // Source name, then trigger tag, then payload.
        records.sort_by(|a, b| {
            (&a.source_state_name, &a.trigger).cmp(&(&b.source_state_name, &b.trigger))
        });
        records
    }

    fn from_entry<'a>(key: &TransitionKey, targets: impl Iterator<Item = &'a str>) -> Self {
        Self {
            source_state_name: key.state.name().to_string(),
            trigger: TriggerRecord::from(&key.trigger),
            target_state_names: targets.map(str::to_string).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomateRecord {
    pub states: Vec<StateRecord>,
    pub transitions: Vec<TransitionRecord>,
    pub start_state_name: String,
    pub error_state: StateRecord,

    #[serde(default)]
    pub end_state_names: Vec<String>,
}

/// Saved execution, including its automaton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Record format version
    pub version: u32,

    pub id: Uuid,

    /// When the record was taken
    pub saved_at: DateTime<Utc>,

    pub automate: AutomateRecord,

    pub current_state_names: Vec<String>,

    /// One entry per step that reached an end state, oldest first.
    pub encountered_end_state_name_sets: Vec<Vec<String>>,

    pub configuration: ExecutionConfiguration,
}
