//! # wdte
//!
//! wdte is an embeddable functional scripting language written in Rust.
//! Scripts are sequences of declarations; every runtime value, from numbers
//! to closures to modules, is a function that can be called with a frame and
//! a list of lazily evaluated arguments. Hosts extend the language by handing
//! native functions and modules to scripts through scopes and imports.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;

use crate::{
    error::Error,
    interpreter::{
        import::{Importer, Registry},
        parser,
        translator::{translate, translate_fragment},
        value::{frame::Frame, func::Func, module::Module},
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the arena parse tree produced by the parser. Every
/// node records its parent, and non-terminal nodes record their children in
/// rule order, so the tree can be walked in either direction without
/// reference cycles.
///
/// # Responsibilities
/// - Stores terminals, expanded non-terminals and empty expansions.
/// - Keeps tokens with their source positions for error reporting.
/// - Reproduces the token stream through an in-order leaf walk.
pub mod ast;
/// Provides unified error types for parsing, translation and evaluation.
///
/// This module defines all errors that can be raised while scanning, parsing,
/// translating or evaluating code. Parse and translation errors abort their
/// phase; runtime errors travel through scripts as error values.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches line and column numbers, or call paths, for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together scanning, parsing, translation, evaluation and
/// the runtime data model to provide a complete runtime for scripts. It
/// exposes the public API for loading modules and calling their functions.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, grammar, parser, translator,
///   evaluator, and value types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// Script numbers are `f64`, while indices and lengths are `usize`. These
/// helpers convert between the two without silent data loss.
pub mod util;

pub use interpreter::{
    evaluator::prelude,
    parser::{parse_fragment, parse_script},
};

/// Parses and translates a script into a module.
///
/// Imports are resolved through `importer`.
///
/// # Errors
/// Returns an error if parsing or translation fails.
///
/// # Examples
/// ```
/// use wdte::{
///     interpreter::{evaluator::prelude, import::Registry, value::{frame::Frame, func::Func}},
///     load,
/// };
///
/// let module = load("answer => 42;", &Registry::new()).unwrap();
/// let answer = module.call(&Frame::new(prelude()), "answer", &[]);
/// assert!(answer.equals(&Func::from(42.0)));
/// ```
pub fn load(source: &str, importer: &dyn Importer) -> Result<Arc<Module>, Error> {
    let tree = parser::parse_script(source)?;
    Ok(Arc::new(translate(&tree, importer)?))
}

/// Parses, translates and evaluates a fragment in `frame`.
///
/// The result may be an error value; only parse and translation failures are
/// returned as `Err`.
///
/// # Examples
/// ```
/// use wdte::{
///     eval_fragment,
///     interpreter::{evaluator::prelude, value::{frame::Frame, func::Func}},
/// };
///
/// let frame = Frame::new(prelude());
/// let result = eval_fragment("5 -> + 2 -- * 3;", &frame).unwrap();
/// assert!(result.equals(&Func::from(7.0)));
/// ```
pub fn eval_fragment(source: &str, frame: &Frame) -> Result<Func, Error> {
    let tree = parser::parse_fragment(source)?;
    Ok(translate_fragment(&tree)?.call(frame, &[]))
}

/// Runs the function `entry` of a script and returns its result.
///
/// The script sees the default prelude and cannot import anything. A final
/// error value is returned as `Err(Error::Runtime)`.
///
/// # Errors
/// Returns an error if parsing or translation fails, or if evaluation ends in
/// an error value.
///
/// # Examples
/// ```
/// use wdte::{get_result, interpreter::value::func::Func};
///
/// let source = "memo fib n => n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };
///               main => fib 10;";
/// let result = get_result(source, "main").unwrap();
/// assert!(result.equals(&Func::from(55.0)));
///
/// // Example with an intentional error (unknown identifier).
/// let res = get_result("main => + x 1;", "main");
/// assert!(res.is_err());
/// ```
pub fn get_result(source: &str, entry: &str) -> Result<Func, Error> {
    let module = load(source, &Registry::new())?;
    let result = module.call(&Frame::new(prelude()), entry, &[]);
    Ok(result.into_result()?)
}
