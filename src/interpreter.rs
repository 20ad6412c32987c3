/// The evaluator executes functions against a frame.
///
/// Every value is called the same way: with a frame and a list of
/// unevaluated arguments. This module implements that call for every kind of
/// value and expression, including the lazy semantics of chains, switches
/// and compounds, and provides the core built-in functions.
///
/// # Responsibilities
/// - Dispatches calls, handling partial and over-application.
/// - Evaluates chains, switches, compounds and array literals.
/// - Checks the cancellation signal at repeated-work sites.
/// - Exposes the core prelude of built-in functions.
pub mod evaluator;
/// The grammar of the language as an LL(1) lookup table.
///
/// Declares the terminals, non-terminals and symbols the parser works with,
/// and the static table mapping a lookahead and a non-terminal to the rule
/// that expands it.
pub mod grammar;
/// Import resolution.
///
/// The translator resolves import declarations through the [`import::Importer`]
/// trait. [`import::Registry`] is the explicit, host-built table of named
/// modules.
pub mod import;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (scanner) reads the raw source text and produces a lazy stream of
/// tokens: numbers, strings, identifiers and keywords, each with its line and
/// column. Symbols glued to identifiers are split off by longest-prefix
/// matching.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Resolves escapes in string literals.
/// - Reports unterminated strings through the scanner's error accessor.
pub mod lexer;
/// The parser module builds the parse tree from tokens.
///
/// The parser consults the grammar table for every non-terminal it expands,
/// keeping an explicit stack of symbols instead of recursing.
///
/// # Responsibilities
/// - Matches terminals against tokens and expands non-terminals.
/// - Builds the arena parse tree with parent links.
/// - Reports syntax errors with line and column.
pub mod parser;
/// The translator turns parse trees into executable functions.
///
/// A script becomes a [`value::module::Module`]; a fragment becomes a single
/// function. Imports are resolved while translating.
pub mod translator;
/// The value module defines the runtime data model.
///
/// Every runtime value is a [`value::func::Func`]. Alongside it live the
/// scopes identifiers resolve in, the frames threaded through calls, modules
/// and the memoization cache.
pub mod value;
