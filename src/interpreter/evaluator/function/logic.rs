use crate::interpreter::value::{
    frame::{EvalResult, Frame},
    func::Func,
};

/// Negates a boolean.
pub fn not(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    frame.arg::<bool>(args, 0).map(|b| (!b).into())
}

/// Returns `true` if every argument is `true`.
///
/// Arguments are forced left to right and forcing stops at the first
/// `false`, so later arguments are never evaluated.
///
/// # Example
/// ```
/// use wdte::interpreter::{
///     evaluator::function::logic::and,
///     value::{frame::Frame, func::Func},
/// };
///
/// let frame = Frame::default();
/// let boom = Func::native("boom", 0, |_, _| panic!("forced"));
///
/// let r = and(&frame, &[Func::from(false), boom]).unwrap();
/// assert!(r.equals(&Func::from(false)));
/// ```
pub fn and(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    for i in 0..args.len() {
        if !frame.arg::<bool>(args, i)? {
            return Ok(false.into());
        }
    }
    Ok(true.into())
}

/// Returns `true` if any argument is `true`.
///
/// Forcing stops at the first `true`.
pub fn or(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    for i in 0..args.len() {
        if frame.arg::<bool>(args, i)? {
            return Ok(true.into());
        }
    }
    Ok(false.into())
}
