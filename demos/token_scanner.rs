//! Token Scanner
//!
//! This example recognises numbers and identifiers with a small
//! nondeterministic automaton driven by a custom trigger type, then saves
//! a half-finished run and resumes it from JSON.
//!
//! Key concepts:
//! - Custom trigger kinds via `CustomTrigger`
//! - Epsilon transitions and branching into several states at once
//! - Named callbacks resolved through a `CallbackRegistry` on load
//! - Saving and restoring an execution with `Storage`
//!
//! Run with: cargo run --example token_scanner

use automate::builder::{AutomateBuilder, ExecutionBuilder};
use automate::core::{Automate, Callback, CustomTrigger, State, Trigger};
use automate::execution::ExecutionConfiguration;
use automate::storage::{CallbackRegistry, Storage, TriggerRegistry};
use tracing_subscriber::EnvFilter;

/// Character class fed to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Class {
    Letter,
    Digit,
    End,
}

impl Class {
    fn of(c: char) -> Self {
        if c.is_ascii_alphabetic() {
            Class::Letter
        } else if c.is_ascii_digit() {
            Class::Digit
        } else {
            Class::End
        }
    }
}

impl CustomTrigger for Class {
    const TAG: &'static str = "class";

    fn payload(&self) -> String {
        format!("{self:?}")
    }
}

fn parse_class(payload: &str) -> Result<Class, String> {
    match payload {
        "Letter" => Ok(Class::Letter),
        "Digit" => Ok(Class::Digit),
        "End" => Ok(Class::End),
        other => Err(format!("unknown class {other:?}")),
    }
}

fn callbacks() -> Result<CallbackRegistry, Box<dyn std::error::Error>> {
    let mut registry = CallbackRegistry::new();
    registry
        .register(Callback::new("number", || println!("  -> number")))?
        .register(Callback::new("identifier", || println!("  -> identifier")))?;
    Ok(registry)
}

// Both branches start from `start` through epsilon edges; whichever one
// cannot follow the input falls into `error` while the other continues.
fn scanner(callbacks: &CallbackRegistry) -> Result<Automate, Box<dyn std::error::Error>> {
    let mut builder = AutomateBuilder::new();
    builder
        .add_state("start")?
        .add_state("num")?
        .add_state("ident")?
        .add_state(State::with_hooks("number", callbacks.resolve("number")?, None, None))?
        .add_state(State::with_hooks(
            "identifier",
            callbacks.resolve("identifier")?,
            None,
            None,
        ))?
        .add_state("error")?
        .add_end_state("number")?
        .add_end_state("identifier")?
        .set_start_state("start")?
        .set_error_state("error")?
        .add_transition("start", Trigger::Epsilon, ["num", "ident"])?
        .add_transition("num", Trigger::custom(Class::Digit), ["num"])?
        .add_transition("num", Trigger::custom(Class::End), ["number"])?
        .add_transition("ident", Trigger::custom(Class::Letter), ["ident"])?
        .add_transition("ident", Trigger::custom(Class::Digit), ["ident"])?
        .add_transition("ident", Trigger::custom(Class::End), ["identifier"])?;
    Ok(builder.build()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Token Scanner ===\n");

    let callbacks = callbacks()?;
    let mut triggers = TriggerRegistry::new();
    triggers.register_custom::<Class, _>(parse_class)?;
    let automate = scanner(&callbacks)?;
    let storage = Storage::new(triggers, callbacks);

    let configuration = ExecutionConfiguration::default()
        .with_allow_stay_on_undefined_transition(false)
        .with_exit_on_end_state_encountered(true);

    let mut execution = ExecutionBuilder::new()
        .automate(automate)
        .configuration(configuration)
        .build()?;

    let input = "x42 ";
    let (head, tail) = input.split_at(2);

    println!("Scanning {input:?}");
    execution.start();
    for c in head.chars() {
        execution.update(Trigger::custom(Class::of(c)))?;
    }
    println!("  after {head:?}: {:?}", execution.current_state_names());

    let json = storage.execution_to_json(&execution)?;
    println!("  saved {} bytes of JSON", json.len());

    let mut resumed = storage.execution_from_json(&json)?;
    for c in tail.chars() {
        if !resumed.update(Trigger::custom(Class::of(c)))? {
            break;
        }
    }

    println!("  final states: {:?}", resumed.current_state_names());
    println!(
        "  end states seen: {:?}",
        resumed.encountered_end_states().names()
    );

    Ok(())
}
