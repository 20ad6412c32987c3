use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::function::core::force_all,
        value::{
            frame::{EvalResult, Frame},
            func::Func,
        },
    },
};

/// Adds numbers, or concatenates when the first argument is a string.
///
/// Accepts two or more arguments. When concatenating, every argument is
/// formatted with its `Display` implementation.
///
/// # Example
/// ```
/// use wdte::interpreter::{
///     evaluator::function::arithmetic::add,
///     value::{frame::Frame, func::Func},
/// };
///
/// let frame = Frame::default();
/// let sum = add(&frame, &[Func::from(1.0), Func::from(2.0), Func::from(3.0)]).unwrap();
/// assert!(sum.equals(&Func::from(6.0)));
///
/// let text = add(&frame, &[Func::from("n = "), Func::from(3.0)]).unwrap();
/// assert!(text.equals(&Func::from("n = 3")));
/// ```
pub fn add(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let values = force_all(frame, args)?;

    if let Some(Func::String(_)) = values.first() {
        return Ok(values.iter().map(ToString::to_string).collect::<String>().into());
    }

    let mut total = 0.0;
    for i in 0..values.len() {
        total += frame.arg::<f64>(&values, i)?;
    }
    Ok(total.into())
}

/// Subtracts the second argument from the first.
///
/// # Example
/// ```
/// use wdte::interpreter::{
///     evaluator::function::arithmetic::sub,
///     value::{frame::Frame, func::Func},
/// };
///
/// let r = sub(&Frame::default(), &[Func::from(10.0), Func::from(4.0)]).unwrap();
/// assert!(r.equals(&Func::from(6.0)));
/// ```
pub fn sub(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let a = frame.arg::<f64>(args, 0)?;
    let b = frame.arg::<f64>(args, 1)?;
    Ok((a - b).into())
}

/// Multiplies two or more numbers.
pub fn mul(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let mut product = 1.0;
    for i in 0..args.len() {
        product *= frame.arg::<f64>(args, i)?;
    }
    Ok(product.into())
}

/// Divides the first argument by the second.
///
/// A zero divisor yields `DivisionByZero` instead of an infinity.
///
/// # Example
/// ```
/// use wdte::{
///     error::RuntimeError,
///     interpreter::{
///         evaluator::function::arithmetic::div,
///         value::{frame::Frame, func::Func},
///     },
/// };
///
/// let frame = Frame::default();
/// assert!(div(&frame, &[Func::from(9.0), Func::from(3.0)]).unwrap().equals(&Func::from(3.0)));
///
/// let err = div(&frame, &[Func::from(1.0), Func::from(0.0)]).unwrap_err();
/// assert_eq!(err.cause, RuntimeError::DivisionByZero);
/// ```
pub fn div(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let (a, b) = divisor_pair(frame, args)?;
    Ok((a / b).into())
}

/// Computes the remainder of dividing the first argument by the second.
pub fn rem(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let (a, b) = divisor_pair(frame, args)?;
    Ok((a % b).into())
}

fn divisor_pair(frame: &Frame, args: &[Func]) -> EvalResult<(f64, f64)> {
    let a = frame.arg::<f64>(args, 0)?;
    let b = frame.arg::<f64>(args, 1)?;
    if b == 0.0 {
        return Err(frame.failure(RuntimeError::DivisionByZero));
    }
    Ok((a, b))
}
