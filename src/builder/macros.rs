//! Macros for inline automaton construction.

/// Build an [`Automate`](crate::core::Automate) from an inline description.
///
/// Expands to a series of [`AutomateBuilder`](crate::builder::AutomateBuilder)
/// calls and evaluates to `Result<Automate, BuildError>`.
///
/// # Example
///
/// ```
/// use automate::automate;
/// use automate::core::Trigger;
///
/// let automate = automate! {
///     states: ["start", "a", "b", "error"],
///     start: "start",
///     error: "error",
///     end: ["b"],
///     transitions: [
///         ("start", "1") => ["a"],
///         ("a", Trigger::Epsilon) => ["b"],
///     ],
/// }
/// .unwrap();
///
/// assert_eq!(automate.transition_table().len(), 2);
/// assert!(automate.is_end_state_name("b"));
/// ```
#[macro_export]
macro_rules! automate {
    (
        states: [$($state:expr),* $(,)?],
        start: $start:expr,
        error: $error:expr
        $(, end: [$($end:expr),* $(,)?])?
        $(, transitions: [
            $(($source:expr, $trigger:expr) => [$($target:expr),+ $(,)?]),* $(,)?
        ])?
        $(,)?
    ) => {{
        (|| -> ::std::result::Result<$crate::core::Automate, $crate::builder::BuildError> {
            let mut builder = $crate::builder::AutomateBuilder::new();
            $(builder.add_state($state)?;)*
            $($(builder.add_end_state($end)?;)*)?
            $($(builder.add_transition($source, $trigger, [$($target),+])?;)*)?
            builder.set_start_state($start)?;
            builder.set_error_state($error)?;
            builder.build()
        })()
    }};
}
