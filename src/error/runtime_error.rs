use std::fmt;

use thiserror::Error;

use crate::interpreter::value::frame::CallPath;

/// Represents the causes of runtime errors.
///
/// A cause never travels alone: evaluation wraps it in a [`Failure`] together
/// with the call path where it originated, and scripts see the pair as an
/// error value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// An identifier was not bound anywhere in the scope chain.
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier {
        /// The identifier that failed to resolve.
        name: String,
    },
    /// A member access named something the module does not declare.
    #[error("module has no member '{name}'")]
    UnknownMember {
        /// The missing member.
        name: String,
    },
    /// A member access was attempted on something that is not a module.
    #[error("cannot access member '{name}' of {found}")]
    NotAModule {
        /// The member that was requested.
        name:  String,
        /// A description of the value that was accessed.
        found: String,
    },
    /// An argument had an unexpected type.
    #[error("expected {expected}, but got {found}")]
    TypeMismatch {
        /// The expected type.
        expected: &'static str,
        /// A description of the value actually received.
        found:    String,
    },
    /// An index pointed past the end of an array or string.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the indexed value.
        len:   usize,
    },
    /// An index was negative, fractional or not finite.
    #[error("{index} is not a valid index")]
    InvalidIndex {
        /// The rejected index.
        index: f64,
    },
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// The evaluation was cancelled through its signal.
    #[error("evaluation cancelled")]
    Cancelled,
    /// The evaluation ran past its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Calls nested deeper than the frame allows.
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit {
        /// The configured maximum depth.
        limit: usize,
    },
    /// An error raised by a script or a host function.
    #[error("{0}")]
    Custom(String),
}

/// The payload of an error value: a cause and the call path it came from.
#[derive(Debug, Clone)]
pub struct Failure {
    /// What went wrong.
    pub cause: RuntimeError,
    /// The chain of function names that were active at the point of origin.
    pub path:  CallPath,
}

impl Failure {
    /// Creates a failure with an empty call path.
    #[must_use]
    pub fn new(cause: RuntimeError) -> Self {
        Self { cause,
               path: CallPath::default() }
    }
}

/// How many of the innermost call path entries a failure shows.
pub const SHOWN_PATH: usize = 8;

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            self.path.fmt_tail(f, SHOWN_PATH)?;
            f.write_str(": ")?;
        }
        write!(f, "{}", self.cause)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
