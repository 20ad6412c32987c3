use crate::interpreter::{
    evaluator::function::core::force_all,
    value::{
        frame::{EvalResult, Frame},
        func::Func,
    },
};

/// Prints its arguments to standard output and returns the last one.
///
/// The arguments are formatted using their `Display` implementation and
/// separated by spaces. Printing is a side effect, so it is usually placed
/// in an ignored chain segment: `x -- print`.
///
/// # Example
/// ```
/// use wdte::interpreter::{
///     evaluator::function::print::print,
///     value::{frame::Frame, func::Func},
/// };
///
/// // The function prints the value to stdout, but the doctest
/// // only checks the returned result.
/// let result = print(&Frame::default(), &[Func::from(42.0)]).unwrap();
/// assert!(result.equals(&Func::from(42.0)));
/// ```
pub fn print(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let values = force_all(frame, args)?;

    let line = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
    println!("{line}");

    Ok(values.last().cloned().unwrap_or_else(|| Func::from(Vec::new())))
}
