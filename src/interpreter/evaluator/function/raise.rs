use crate::{
    error::RuntimeError,
    interpreter::value::{
        frame::{EvalResult, Frame},
        func::Func,
    },
};

/// Builds an error value carrying a message.
///
/// The message is the argument formatted with its `Display` implementation.
///
/// # Example
/// ```
/// use wdte::{
///     error::RuntimeError,
///     interpreter::{
///         evaluator::function::raise::error,
///         value::{frame::Frame, func::Func},
///     },
/// };
///
/// let err = error(&Frame::default(), &[Func::from("nope")]).unwrap_err();
/// assert_eq!(err.cause, RuntimeError::Custom("nope".into()));
/// ```
pub fn error(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let message = frame.arg::<Func>(args, 0)?;
    Err(frame.failure(RuntimeError::Custom(message.to_string())))
}
