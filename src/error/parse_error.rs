use thiserror::Error;

/// Represents all errors that can occur while scanning or parsing.
///
/// Messages are rendered as `line:column: message`, where both numbers are
/// 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A string literal was still open when the input ended.
    #[error("{line}:{column}: unterminated string")]
    UnterminatedString {
        /// The line of the opening quote.
        line:   usize,
        /// The column of the opening quote.
        column: usize,
    },
    /// A terminal on the parser stack did not match the lookahead token.
    #[error("{line}:{column}: expected {expected}, but found {found}")]
    UnexpectedToken {
        /// The expected terminal.
        expected: String,
        /// The token that was found instead.
        found:    String,
        /// The line of the offending token.
        line:     usize,
        /// The column of the offending token.
        column:   usize,
    },
    /// The grammar table has no rule for the lookahead in this context.
    #[error("{line}:{column}: no rule for ({found}, <{nterm}>)")]
    NoRule {
        /// The non-terminal being expanded.
        nterm:  String,
        /// The lookahead token.
        found:  String,
        /// The line of the offending token.
        line:   usize,
        /// The column of the offending token.
        column: usize,
    },
    /// The input ended while more symbols were expected.
    #[error("{line}:{column}: expected {expected}, but found EOF")]
    UnexpectedEof {
        /// The symbol that was expected.
        expected: String,
        /// The line where the input ended.
        line:     usize,
        /// The column where the input ended.
        column:   usize,
    },
    /// A complete parse was followed by extra tokens.
    #[error("{line}:{column}: expected end of input, but found {found}")]
    ExpectedEof {
        /// The token found after the end of the program.
        found:  String,
        /// The line of the extra token.
        line:   usize,
        /// The column of the extra token.
        column: usize,
    },
}

impl ParseError {
    /// Returns the `(line, column)` position this error refers to.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::UnterminatedString { line, column }
            | Self::UnexpectedToken { line, column, .. }
            | Self::NoRule { line, column, .. }
            | Self::UnexpectedEof { line, column, .. }
            | Self::ExpectedEof { line, column, .. } => (*line, *column),
        }
    }
}
