//! States and the hooks fired when an execution enters, leaves or stays in them.
//!
//! A [`State`] is identified by its name alone: equality, ordering and
//! hashing ignore the hooks. Inside an automaton every structure shares
//! the same [`StateRef`] for a given name, so replacing a hook through any
//! reference is visible everywhere.

use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a state.
pub type StateRef = Arc<State>;

/// Set of states ordered by name.
///
/// The ordering makes hook firing deterministic across runs. Callers must
/// not rely on it for anything beyond reproducibility.
pub type StateSet = BTreeSet<StateRef>;

/// Named side-effecting hook.
///
/// The name is what gets persisted; two callbacks with the same name are
/// considered equal.
///
/// # Example
///
/// ```rust
/// use automate::core::Callback;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let callback = Callback::new("count", move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// callback.run();
/// assert_eq!(callback.name(), "count");
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Callback {
    name: String,
    action: Arc<dyn Fn() + Send + Sync>,
}

impl Callback {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the hook on the calling thread.
    pub fn run(&self) {
        (self.action)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Callback {}

#[derive(Default)]
struct Hooks {
    on_entry: Option<Callback>,
    on_exit: Option<Callback>,
    on_stay: Option<Callback>,
}

/// A node of the automaton graph.
///
/// # Example
///
/// ```rust
/// use automate::core::{Callback, State};
///
/// let plain = State::new("idle");
/// let wired = State::new("idle").with_on_entry(Callback::new("log", || {}));
///
/// // Identity is the name, hooks are ignored.
/// assert_eq!(plain, wired);
/// assert!(plain.on_entry().is_none());
/// assert_eq!(wired.on_entry().unwrap().name(), "log");
/// ```
pub struct State {
    name: String,
    hooks: RwLock<Hooks>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: RwLock::new(Hooks::default()),
        }
    }

    /// Create a state with any combination of hooks.
    pub fn with_hooks(
        name: impl Into<String>,
        on_entry: Option<Callback>,
        on_exit: Option<Callback>,
        on_stay: Option<Callback>,
    ) -> Self {
        Self {
            name: name.into(),
            hooks: RwLock::new(Hooks {
                on_entry,
                on_exit,
                on_stay,
            }),
        }
    }

    pub fn with_on_entry(self, callback: Callback) -> Self {
        self.set_on_entry(Some(callback));
        self
    }

    pub fn with_on_exit(self, callback: Callback) -> Self {
        self.set_on_exit(Some(callback));
        self
    }

    pub fn with_on_stay(self, callback: Callback) -> Self {
        self.set_on_stay(Some(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_entry(&self) -> Option<Callback> {
        self.hooks.read().on_entry.clone()
    }

    pub fn on_exit(&self) -> Option<Callback> {
        self.hooks.read().on_exit.clone()
    }

    pub fn on_stay(&self) -> Option<Callback> {
        self.hooks.read().on_stay.clone()
    }

    /// Replace the entry hook. Visible through every shared reference.
    pub fn set_on_entry(&self, callback: Option<Callback>) {
        self.hooks.write().on_entry = callback;
    }

    pub fn set_on_exit(&self, callback: Option<Callback>) {
        self.hooks.write().on_exit = callback;
    }

    pub fn set_on_stay(&self, callback: Option<Callback>) {
        self.hooks.write().on_stay = callback;
    }

    pub(crate) fn fire_entry(&self) {
        self.fire("entry", self.on_entry());
    }

    pub(crate) fn fire_exit(&self) {
        self.fire("exit", self.on_exit());
    }

    pub(crate) fn fire_stay(&self) {
        self.fire("stay", self.on_stay());
    }

    // The lock is released before the hook runs so a hook may rewire
    // its own state.
    fn fire(&self, hook: &'static str, callback: Option<Callback>) {
        if let Some(callback) = callback {
            tracing::trace!(state = %self.name, hook, callback = callback.name(), "firing hook");
            callback.run();
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        f.debug_struct("State")
            .field("name", &self.name)
            .field("on_entry", &hooks.on_entry.as_ref().map(Callback::name))
            .field("on_exit", &hooks.on_exit.as_ref().map(Callback::name))
            .field("on_stay", &hooks.on_stay.as_ref().map(Callback::name))
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Anything that names a state: a plain name or a state itself.
pub trait AsStateName {
    fn state_name(&self) -> &str;
}

impl AsStateName for str {
    fn state_name(&self) -> &str {
        self
    }
}

impl AsStateName for String {
    fn state_name(&self) -> &str {
        self
    }
}

impl AsStateName for State {
    fn state_name(&self) -> &str {
        &self.name
    }
}

impl AsStateName for StateRef {
    fn state_name(&self) -> &str {
        &self.name
    }
}

impl<T: AsStateName + ?Sized> AsStateName for &T {
    fn state_name(&self) -> &str {
        (**self).state_name()
    }
}

/// Conversion into a shared state handle.
///
/// Passing a [`StateRef`] keeps the caller's instance, so hooks replaced
/// through the caller's handle stay in sync with the automaton.
pub trait IntoStateRef {
    fn into_state_ref(self) -> StateRef;
}

impl IntoStateRef for StateRef {
    fn into_state_ref(self) -> StateRef {
        self
    }
}

impl IntoStateRef for State {
    fn into_state_ref(self) -> StateRef {
        Arc::new(self)
    }
}

impl IntoStateRef for &str {
    fn into_state_ref(self) -> StateRef {
        Arc::new(State::new(self))
    }
}

impl IntoStateRef for String {
    fn into_state_ref(self) -> StateRef {
        Arc::new(State::new(self))
    }
}
