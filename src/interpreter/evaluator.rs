/// Evaluation of chains.
///
/// Threads a running value through `->`, `--` and `-|` segments and binds
/// slots for the rest of the chain.
pub mod chain;

/// Evaluation of compounds, collectors and `let` bindings.
pub mod compound;

/// Core evaluation logic.
///
/// Implements the call protocol shared by every value: plain values return
/// themselves, functions bind or save their arguments, and expression nodes
/// evaluate themselves against the frame.
pub mod core;

/// Built-in functions.
///
/// The core set of functions scripts expect to find in scope: arithmetic,
/// comparisons, boolean logic, indexing, errors and printing.
pub mod function;

/// Evaluation of switches.
pub mod switch;

pub use self::function::core::{BUILTIN_FUNCTIONS, prelude};
