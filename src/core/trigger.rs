//! Inputs consumed by one execution step.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Caller-defined trigger kind.
///
/// Equality and hashing come from the implementing type. `TAG` and
/// `payload` are what the persistence layer stores; a reconstructor
/// registered under the same tag turns the payload back into a value.
///
/// # Example
///
/// ```rust
/// use automate::core::{CustomTrigger, Trigger};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct KeyPress(char);
///
/// impl CustomTrigger for KeyPress {
///     const TAG: &'static str = "key";
///
///     fn payload(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// let a = Trigger::custom(KeyPress('a'));
/// assert_eq!(a, Trigger::custom(KeyPress('a')));
/// assert_ne!(a, Trigger::text("a"));
/// assert_eq!(a.downcast_ref::<KeyPress>(), Some(&KeyPress('a')));
/// ```
pub trait CustomTrigger: fmt::Debug + Eq + Hash + Send + Sync + 'static {
    const TAG: &'static str;

    fn payload(&self) -> String;
}

// Object-safe view of a `CustomTrigger`.
trait DynTrigger: fmt::Debug + Send + Sync {
    fn tag(&self) -> &'static str;
    fn payload(&self) -> String;
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynTrigger) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: CustomTrigger> DynTrigger for T {
    fn tag(&self) -> &'static str {
        T::TAG
    }

    fn payload(&self) -> String {
        CustomTrigger::payload(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynTrigger) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        T::TAG.hash(&mut state);
        self.hash(&mut state);
    }
}

/// Value used to select a transition.
#[derive(Clone)]
pub enum Trigger {
    /// Taken without consuming input, during epsilon closure.
    Epsilon,
    Text(String),
    Custom(CustomValue),
}

/// Type-erased custom trigger.
#[derive(Clone)]
pub struct CustomValue(Arc<dyn DynTrigger>);

impl Trigger {
    pub const EPSILON_TAG: &'static str = "epsilon";
    pub const TEXT_TAG: &'static str = "text";

    pub fn text(text: impl Into<String>) -> Self {
        Trigger::Text(text.into())
    }

    pub fn custom<T: CustomTrigger>(value: T) -> Self {
        Trigger::Custom(CustomValue(Arc::new(value)))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Trigger::Epsilon)
    }

    /// Discriminator used when persisting the trigger.
    pub fn tag(&self) -> &str {
        match self {
            Trigger::Epsilon => Self::EPSILON_TAG,
            Trigger::Text(_) => Self::TEXT_TAG,
            Trigger::Custom(value) => value.0.tag(),
        }
    }

    /// Serialized form of the trigger's value.
    pub fn payload(&self) -> String {
        match self {
            Trigger::Epsilon => String::new(),
            Trigger::Text(text) => text.clone(),
            Trigger::Custom(value) => value.0.payload(),
        }
    }

    pub fn downcast_ref<T: CustomTrigger>(&self) -> Option<&T> {
        match self {
            Trigger::Custom(value) => value.0.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Trigger::Epsilon, Trigger::Epsilon) => true,
            (Trigger::Text(a), Trigger::Text(b)) => a == b,
            (Trigger::Custom(a), Trigger::Custom(b)) => a.0.dyn_eq(b.0.as_ref()),
            _ => false,
        }
    }
}

impl Eq for Trigger {}

impl Hash for Trigger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Trigger::Epsilon => {}
            Trigger::Text(text) => text.hash(state),
            Trigger::Custom(value) => value.0.dyn_hash(state),
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Epsilon => f.write_str("Epsilon"),
            Trigger::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Trigger::Custom(value) => f.debug_tuple("Custom").field(&value.0).finish(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Epsilon => f.write_str("ε"),
            Trigger::Text(text) => write!(f, "{text:?}"),
            Trigger::Custom(value) => write!(f, "{}({})", value.0.tag(), value.0.payload()),
        }
    }
}

impl From<&str> for Trigger {
    fn from(text: &str) -> Self {
        Trigger::Text(text.to_string())
    }
}

impl From<String> for Trigger {
    fn from(text: String) -> Self {
        Trigger::Text(text)
    }
}

impl From<&Trigger> for Trigger {
    fn from(trigger: &Trigger) -> Self {
        trigger.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Digit(u8);

    impl CustomTrigger for Digit {
        const TAG: &'static str = "digit";

        fn payload(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Letter(u8);

    impl CustomTrigger for Letter {
        const TAG: &'static str = "letter";

        fn payload(&self) -> String {
            self.0.to_string()
        }
    }

    fn hash_of(trigger: &Trigger) -> u64 {
        let mut hasher = DefaultHasher::new();
        trigger.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn epsilon_equals_only_itself() {
        assert_eq!(Trigger::Epsilon, Trigger::Epsilon);
        assert_ne!(Trigger::Epsilon, Trigger::text(""));
        assert_ne!(Trigger::Epsilon, Trigger::custom(Digit(0)));
        assert_eq!(hash_of(&Trigger::Epsilon), hash_of(&Trigger::Epsilon));
    }

    #[test]
    fn text_compares_by_value() {
        assert_eq!(Trigger::text("1"), Trigger::from("1"));
        assert_ne!(Trigger::text("1"), Trigger::text("0"));
        assert_eq!(hash_of(&Trigger::text("1")), hash_of(&Trigger::from("1")));
    }

    #[test]
    fn custom_compares_by_type_and_value() {
        assert_eq!(Trigger::custom(Digit(3)), Trigger::custom(Digit(3)));
        assert_ne!(Trigger::custom(Digit(3)), Trigger::custom(Digit(4)));
        assert_ne!(Trigger::custom(Digit(3)), Trigger::custom(Letter(3)));
        assert_ne!(Trigger::custom(Digit(3)), Trigger::text("3"));
        assert_eq!(
            hash_of(&Trigger::custom(Digit(3))),
            hash_of(&Trigger::custom(Digit(3)))
        );
    }

    #[test]
    fn triggers_work_as_set_keys() {
        let set: HashSet<Trigger> = [
            Trigger::Epsilon,
            Trigger::Epsilon,
            Trigger::text("a"),
            Trigger::text("a"),
            Trigger::custom(Digit(1)),
            Trigger::custom(Digit(1)),
            Trigger::custom(Letter(1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 4);
    }

    #[test]
    fn tag_and_payload_per_variant() {
        assert_eq!(Trigger::Epsilon.tag(), "epsilon");
        assert_eq!(Trigger::Epsilon.payload(), "");
        assert_eq!(Trigger::text("go").tag(), "text");
        assert_eq!(Trigger::text("go").payload(), "go");
        assert_eq!(Trigger::custom(Digit(7)).tag(), "digit");
        assert_eq!(Trigger::custom(Digit(7)).payload(), "7");
    }

    #[test]
    fn downcast_recovers_custom_value() {
        let trigger = Trigger::custom(Digit(9));
        assert_eq!(trigger.downcast_ref::<Digit>(), Some(&Digit(9)));
        assert_eq!(trigger.downcast_ref::<Letter>(), None);
        assert_eq!(Trigger::text("9").downcast_ref::<Digit>(), None);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Trigger::Epsilon.to_string(), "ε");
        assert_eq!(Trigger::text("1").to_string(), "\"1\"");
        assert_eq!(Trigger::custom(Digit(2)).to_string(), "digit(2)");
    }
}
