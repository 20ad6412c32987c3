/// Arithmetic built-ins: `+`, `-`, `*`, `/` and `%`.
///
/// `+` also concatenates when its first argument is a string.
pub mod arithmetic;
/// Indexing built-ins: `at` and `len`.
///
/// Both work on arrays and strings alike.
pub mod array;
/// Comparison built-ins: `==`, `<`, `>`, `<=` and `>=`.
pub mod comparison;
/// The built-in table and the prelude scope.
pub mod core;
/// Boolean built-ins: `!`, `&&` and `||`.
///
/// `&&` and `||` stop forcing arguments as soon as the result is known.
pub mod logic;
/// The `print` function implementation.
///
/// Outputs its arguments to standard output.
pub mod print;
/// The `error` function implementation.
pub mod raise;
