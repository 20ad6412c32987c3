use std::cmp::Ordering;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        frame::{EvalResult, Frame},
        func::Func,
    },
};

/// Tests two values for structural equality.
///
/// Numbers, strings, booleans and arrays compare by content; functions and
/// modules only equal themselves. Values of different types are never equal.
///
/// # Example
/// ```
/// use wdte::interpreter::{
///     evaluator::function::comparison::equal,
///     value::{frame::Frame, func::Func},
/// };
///
/// let frame = Frame::default();
/// let a = Func::from(vec![Func::from(1.0), Func::from("x")]);
/// let b = Func::from(vec![Func::from(1.0), Func::from("x")]);
///
/// assert!(equal(&frame, &[a, b]).unwrap().equals(&Func::from(true)));
/// assert!(equal(&frame, &[Func::from(1.0), Func::from("1")]).unwrap().equals(&Func::from(false)));
/// ```
pub fn equal(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let a = frame.arg::<Func>(args, 0)?;
    let b = frame.arg::<Func>(args, 1)?;
    Ok(a.equals(&b).into())
}

/// Tests whether the first argument is less than the second.
pub fn less(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    compare(frame, args).map(|ord| matches!(ord, Some(Ordering::Less)).into())
}

/// Tests whether the first argument is greater than the second.
pub fn greater(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    compare(frame, args).map(|ord| matches!(ord, Some(Ordering::Greater)).into())
}

/// Tests whether the first argument is less than or equal to the second.
pub fn less_equal(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    compare(frame, args).map(|ord| matches!(ord, Some(Ordering::Less | Ordering::Equal)).into())
}

/// Tests whether the first argument is greater than or equal to the second.
pub fn greater_equal(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    compare(frame, args).map(|ord| matches!(ord, Some(Ordering::Greater | Ordering::Equal)).into())
}

/// Orders two numbers or two strings.
///
/// Returns `None` when either number is NaN, so every ordering test is false.
fn compare(frame: &Frame, args: &[Func]) -> EvalResult<Option<Ordering>> {
    let a = frame.arg::<Func>(args, 0)?;
    let b = frame.arg::<Func>(args, 1)?;

    match (&a, &b) {
        (Func::Number(x), Func::Number(y)) => Ok(x.partial_cmp(y)),
        (Func::String(x), Func::String(y)) => Ok(Some(x.cmp(y))),
        (Func::Number(_) | Func::String(_), other) | (other, _) => {
            Err(frame.failure(RuntimeError::TypeMismatch { expected: "number or string",
                                                           found:    other.type_name().into(), }))
        },
    }
}
