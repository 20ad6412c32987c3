use std::sync::Arc;

use thiserror::Error;

/// Parsing errors.
///
/// Defines the errors that can occur while scanning and parsing source code:
/// malformed literals, grammar table misses and terminal mismatches. Every
/// variant carries the line and column of the offending position.
pub mod parse_error;
/// Runtime errors.
///
/// Contains the causes carried by error values during evaluation, such as
/// failed lookups, type mismatches, out of range indices and cancellation.
/// Runtime errors never unwind; they travel through scripts as ordinary
/// values wrapped in a [`Failure`].
pub mod runtime_error;
/// Translation and import errors.
///
/// Raised while turning a parse tree into a module, most notably when the
/// injected import resolver rejects an import declaration.
pub mod translate_error;

pub use parse_error::ParseError;
pub use runtime_error::{Failure, RuntimeError};
pub use translate_error::{ImportError, TranslateError};

/// Any error that stops a script before or after it runs.
///
/// Parse and translation errors abort their phase entirely. A runtime error
/// only shows up here when an entry point converts a final error value into a
/// `Result`.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be scanned or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parse tree could not be translated into a module.
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// Evaluation finished with an error value.
    #[error(transparent)]
    Runtime(#[from] Arc<Failure>),
}
