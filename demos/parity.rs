//! Parity Automaton
//!
//! This example runs the classic two-state parity checker over a few bit
//! strings and prints where each run ends up.
//!
//! Key concepts:
//! - Building an automaton with the `automate!` macro
//! - Entry hooks fired as the execution moves between states
//! - Falling into the error state on an undefined trigger
//!
//! Run with: cargo run --example parity
//! Set RUST_LOG=automate=debug to see each step.

use automate::automate;
use automate::core::Callback;
use automate::execution::{Execution, ExecutionConfiguration};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Parity Automaton ===\n");

    let automate = Arc::new(automate! {
        states: ["pair", "nonPair", "error"],
        start: "pair",
        error: "error",
        end: ["pair"],
        transitions: [
            ("pair", "1") => ["nonPair"],
            ("pair", "0") => ["pair"],
            ("nonPair", "1") => ["pair"],
            ("nonPair", "0") => ["nonPair"],
        ],
    }?);

    if let Some(error) = automate.state("error") {
        error.set_on_entry(Some(Callback::new("reject", || {
            println!("  rejected: not a bit");
        })));
    }

    for input in ["01001", "0110", "1", "10x1"] {
        println!("Input {input:?}");
        let mut execution = Execution::new(Arc::clone(&automate), ExecutionConfiguration::default());
        execution.start();

        for bit in input.chars() {
            if !execution.update(bit.to_string())? {
                break;
            }
        }

        println!("  final states: {:?}\n", execution.current_state_names());
    }

    Ok(())
}
