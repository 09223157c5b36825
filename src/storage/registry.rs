//! Lookup tables used to turn records back into live values.

use crate::core::{Callback, CustomTrigger, Trigger};
use crate::storage::error::StorageError;
use crate::storage::records::{TriggerRecord, NO_CALLBACK};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns a stored payload back into a trigger.
pub type TriggerReconstructor = Arc<dyn Fn(&str) -> Result<Trigger, String> + Send + Sync>;

/// Reconstructors keyed by trigger tag.
///
/// `epsilon` and `text` are registered on creation. Custom trigger kinds
/// must be registered by the host before loading records that use them.
///
/// # Example
///
/// ```rust
/// use automate::core::{CustomTrigger, Trigger};
/// use automate::storage::{TriggerRecord, TriggerRegistry};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Digit(u8);
///
/// impl CustomTrigger for Digit {
///     const TAG: &'static str = "digit";
///
///     fn payload(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// let mut registry = TriggerRegistry::new();
/// registry
///     .register_custom::<Digit, _>(|payload| payload.parse().map(Digit).map_err(|e| format!("{e}")))
///     .unwrap();
///
/// let record = TriggerRecord::from(&Trigger::custom(Digit(4)));
/// assert_eq!(registry.resolve(&record).unwrap(), Trigger::custom(Digit(4)));
/// ```
#[derive(Clone)]
pub struct TriggerRegistry {
    reconstructors: HashMap<String, TriggerReconstructor>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        let mut reconstructors: HashMap<String, TriggerReconstructor> = HashMap::new();
        reconstructors.insert(
            Trigger::EPSILON_TAG.to_string(),
            Arc::new(|_: &str| Ok(Trigger::Epsilon)),
        );
        reconstructors.insert(
            Trigger::TEXT_TAG.to_string(),
            Arc::new(|payload: &str| Ok(Trigger::text(payload))),
        );
        Self { reconstructors }
    }

    /// Register a reconstructor under `tag`.
    pub fn register<F>(&mut self, tag: impl Into<String>, reconstructor: F) -> Result<&mut Self, StorageError>
    where
        F: Fn(&str) -> Result<Trigger, String> + Send + Sync + 'static,
    {
        let tag = tag.into();
        if self.reconstructors.contains_key(&tag) {
            return Err(StorageError::DuplicateTrigger { tag });
        }
        self.reconstructors.insert(tag, Arc::new(reconstructor));
        Ok(self)
    }

    /// Register a parser for a custom trigger kind under `T::TAG`.
    pub fn register_custom<T, F>(&mut self, parse: F) -> Result<&mut Self, StorageError>
    where
        T: CustomTrigger,
        F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
    {
        self.register(T::TAG, move |payload| parse(payload).map(Trigger::custom))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.reconstructors.contains_key(tag)
    }

    pub fn resolve(&self, record: &TriggerRecord) -> Result<Trigger, StorageError> {
        let reconstructor =
            self.reconstructors
                .get(&record.tag)
                .ok_or_else(|| StorageError::UnknownTrigger {
                    tag: record.tag.clone(),
                })?;

        reconstructor(record.payload.as_str()).map_err(|reason| StorageError::InvalidTrigger {
            tag: record.tag.clone(),
            reason,
        })
    }
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.reconstructors.keys().collect();
        tags.sort();
        f.debug_struct("TriggerRegistry").field("tags", &tags).finish()
    }
}

/// Callbacks keyed by name.
#[derive(Clone, Debug, Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, callback: Callback) -> Result<&mut Self, StorageError> {
        let name = callback.name().to_string();
        if self.callbacks.contains_key(&name) {
            return Err(StorageError::DuplicateCallback { name });
        }
        self.callbacks.insert(name, callback);
        Ok(self)
    }

    /// `"none"` counts as registered.
    pub fn contains(&self, name: &str) -> bool {
        name == NO_CALLBACK || self.callbacks.contains_key(name)
    }

    /// Look up a callback. `"none"` resolves to `None`.
    pub fn resolve(&self, name: &str) -> Result<Option<Callback>, StorageError> {
        if name == NO_CALLBACK {
            return Ok(None);
        }
        self.callbacks
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| StorageError::UnknownCallback {
                name: name.to_string(),
            })
    }

    pub(crate) fn resolve_optional(&self, name: Option<&str>) -> Result<Option<Callback>, StorageError> {
        match name {
            Some(name) => self.resolve(name),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Digit(u8);

    impl CustomTrigger for Digit {
        const TAG: &'static str = "digit";

        fn payload(&self) -> String {
            self.0.to_string()
        }
    }

    fn record(tag: &str, payload: &str) -> TriggerRecord {
        TriggerRecord {
            tag: tag.to_string(),
            payload: payload.to_string(),
        }
    }

    fn digits() -> TriggerRegistry {
        let mut registry = TriggerRegistry::new();
        registry
            .register_custom::<Digit, _>(|payload| {
                payload.parse().map(Digit).map_err(|e| format!("{e}"))
            })
            .unwrap();
        registry
    }

    #[test]
    fn builtin_tags_are_registered() {
        let registry = TriggerRegistry::new();

        assert_eq!(registry.resolve(&record("epsilon", "")).unwrap(), Trigger::Epsilon);
        assert_eq!(registry.resolve(&record("text", "1")).unwrap(), Trigger::text("1"));
    }

    #[test]
    fn custom_trigger_resolves() {
        let registry = digits();

        assert_eq!(
            registry.resolve(&record("digit", "7")).unwrap(),
            Trigger::custom(Digit(7))
        );
        assert!(registry.contains("digit"));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let result = TriggerRegistry::new().resolve(&record("digit", "7"));

        assert!(matches!(result, Err(StorageError::UnknownTrigger { tag }) if tag == "digit"));
    }

    #[test]
    fn bad_payload_is_rejected() {
        let result = digits().resolve(&record("digit", "seven"));

        assert!(matches!(result, Err(StorageError::InvalidTrigger { tag, .. }) if tag == "digit"));
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut registry = TriggerRegistry::new();
        let result = registry.register("text", |payload| Ok(Trigger::text(payload)));

        assert!(matches!(result, Err(StorageError::DuplicateTrigger { tag }) if tag == "text"));
    }

    #[test]
    fn callbacks_resolve_by_name() {
        let mut registry = CallbackRegistry::new();
        registry.register(Callback::new("log", || {})).unwrap();

        assert_eq!(registry.resolve("log").unwrap().map(|c| c.name().to_string()), Some("log".to_string()));
        assert!(registry.resolve("none").unwrap().is_none());
        assert!(registry.contains("none"));
        assert!(matches!(
            registry.resolve("missing"),
            Err(StorageError::UnknownCallback { name }) if name == "missing"
        ));
    }

    #[test]
    fn duplicate_callback_is_rejected() {
        let mut registry = CallbackRegistry::new();
        registry.register(Callback::new("log", || {})).unwrap();

        let result = registry.register(Callback::new("log", || {}));

        assert!(matches!(result, Err(StorageError::DuplicateCallback { name }) if name == "log"));
    }
}
