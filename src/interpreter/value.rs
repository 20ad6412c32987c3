/// Conversions between script values and host types.
///
/// Host functions read their arguments through the [`convert::FromFunc`]
/// table and return anything that converts into a [`func::Func`]. The
/// `native_unary` and `native_binary` helpers combine both directions.
pub mod convert;
/// The per-call evaluation context.
///
/// A [`frame::Frame`] carries the active scope, the call path used to
/// attribute errors, a recursion depth counter and the cancellation
/// [`frame::Signal`].
pub mod frame;
/// The universal value type and the node shapes it is built from.
pub mod func;
/// Result caching for `memo` functions.
pub mod memo;
/// Modules: named declarations and imports.
pub mod module;
/// Persistent lexical scopes.
pub mod scope;
