use crate::{
    error::RuntimeError,
    interpreter::value::{
        frame::{EvalResult, Frame},
        func::Func,
    },
    util::num::{f64_to_index, usize_to_f64},
};

/// Returns the element of an array, or the character of a string, at an
/// index.
///
/// The arguments may come in either order, so `at xs 1` and `xs -> at 1`
/// both work. Indices start at zero.
///
/// # Errors
/// - `InvalidIndex` for negative, fractional or non-finite indices.
/// - `IndexOutOfRange` for indices past the end.
///
/// # Example
/// ```
/// use wdte::{
///     error::RuntimeError,
///     interpreter::{
///         evaluator::function::array::at,
///         value::{frame::Frame, func::Func},
///     },
/// };
///
/// let frame = Frame::default();
/// let xs = Func::from(vec![Func::from(1.0), Func::from(2.0), Func::from(3.0)]);
///
/// let second = at(&frame, &[xs.clone(), Func::from(1.0)]).unwrap();
/// assert!(second.equals(&Func::from(2.0)));
///
/// let err = at(&frame, &[Func::from(5.0), xs]).unwrap_err();
/// assert_eq!(err.cause, RuntimeError::IndexOutOfRange { index: 5, len: 3 });
/// ```
pub fn at(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    let first = frame.arg::<Func>(args, 0)?;
    let second = frame.arg::<Func>(args, 1)?;

    let (collection, index) = match (&first, &second) {
        (_, Func::Number(n)) => (&first, *n),
        (Func::Number(n), _) => (&second, *n),
        _ => {
            return Err(frame.failure(RuntimeError::TypeMismatch { expected: "number",
                                                                  found:    second.type_name().into(), }));
        },
    };
    let index = f64_to_index(index).map_err(|cause| frame.failure(cause))?;

    match collection {
        Func::Array(items) => items.get(index).cloned().ok_or_else(|| {
                                                          frame.failure(RuntimeError::IndexOutOfRange { index,
                                                                                                        len: items.len() })
                                                      }),
        Func::String(s) => s.chars().nth(index).map(|c| Func::from(c.to_string())).ok_or_else(|| {
                                                       frame.failure(RuntimeError::IndexOutOfRange { index,
                                                                                                     len: s.chars().count() })
                                                   }),
        other => Err(frame.failure(RuntimeError::TypeMismatch { expected: "array or string",
                                                                found:    other.type_name().into(), })),
    }
}

/// Returns the number of elements of an array or characters of a string.
pub fn len(frame: &Frame, args: &[Func]) -> EvalResult<Func> {
    match frame.arg::<Func>(args, 0)? {
        Func::Array(items) => Ok(usize_to_f64(items.len()).into()),
        Func::String(s) => Ok(usize_to_f64(s.chars().count()).into()),
        other => Err(frame.failure(RuntimeError::TypeMismatch { expected: "array or string",
                                                                found:    other.type_name().into(), })),
    }
}
