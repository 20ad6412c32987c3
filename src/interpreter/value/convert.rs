use std::sync::Arc;

use crate::{
    error::{Failure, RuntimeError},
    interpreter::value::{
        frame::{EvalResult, Frame},
        func::Func,
    },
};

/// Conversion from a forced script value into a host type.
///
/// This is the fixed table host functions use to read their arguments.
pub trait FromFunc: Sized {
    /// The name of the expected script type, for error messages.
    const EXPECTED: &'static str;

    /// Converts `value`, or returns `None` if it has the wrong type.
    fn from_func(value: &Func) -> Option<Self>;
}

impl FromFunc for f64 {
    const EXPECTED: &'static str = "number";

    fn from_func(value: &Func) -> Option<Self> {
        match value {
            Func::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromFunc for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_func(value: &Func) -> Option<Self> {
        match value {
            Func::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromFunc for Arc<str> {
    const EXPECTED: &'static str = "string";

    fn from_func(value: &Func) -> Option<Self> {
        match value {
            Func::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromFunc for String {
    const EXPECTED: &'static str = "string";

    fn from_func(value: &Func) -> Option<Self> {
        Arc::<str>::from_func(value).map(|s| s.to_string())
    }
}

impl FromFunc for Vec<Func> {
    const EXPECTED: &'static str = "array";

    fn from_func(value: &Func) -> Option<Self> {
        match value {
            Func::Array(items) => Some(items.to_vec()),
            _ => None,
        }
    }
}

impl FromFunc for Func {
    const EXPECTED: &'static str = "value";

    fn from_func(value: &Func) -> Option<Self> {
        Some(value.clone())
    }
}

impl From<f64> for Func {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Func {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Func {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Func {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl From<Arc<str>> for Func {
    fn from(value: Arc<str>) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Func {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value.into())
    }
}

impl From<Arc<Failure>> for Func {
    fn from(value: Arc<Failure>) -> Self {
        Self::Error(value)
    }
}

impl<T> From<EvalResult<T>> for Func
    where T: Into<Self>
{
    fn from(value: EvalResult<T>) -> Self {
        value.map_or_else(Self::Error, Into::into)
    }
}

/// Forces an argument, turning error values into `Err`.
pub fn force(frame: &Frame, arg: &Func) -> EvalResult<Func> {
    arg.call(frame, &[]).into_result()
}

impl Frame {
    /// Forces argument `index` and converts it to `T`.
    ///
    /// A missing argument or a value of the wrong type becomes a
    /// `TypeMismatch` failure attributed to this frame.
    ///
    /// # Example
    /// ```
    /// use wdte::interpreter::value::{frame::Frame, func::Func};
    ///
    /// let frame = Frame::default();
    /// let args = [Func::from(2.0), Func::from("x")];
    ///
    /// assert_eq!(frame.arg::<f64>(&args, 0).unwrap(), 2.0);
    /// assert!(frame.arg::<f64>(&args, 1).is_err());
    /// ```
    pub fn arg<T: FromFunc>(&self, args: &[Func], index: usize) -> EvalResult<T> {
        let Some(arg) = args.get(index) else {
            return Err(self.failure(RuntimeError::TypeMismatch { expected: T::EXPECTED,
                                                                 found:    "nothing".into(), }));
        };
        let value = force(self, arg)?;
        T::from_func(&value).ok_or_else(|| {
                                self.failure(RuntimeError::TypeMismatch { expected: T::EXPECTED,
                                                                          found:    value.type_name()
                                                                                         .into(), })
                            })
    }
}

impl Func {
    /// Wraps a one-argument host function that works on converted values.
    ///
    /// # Example
    /// ```
    /// use wdte::interpreter::value::{frame::Frame, func::Func};
    ///
    /// let double = Func::native_unary("double", |n: f64| n * 2.0);
    /// let result = double.call(&Frame::default(), &[Func::from(4.0)]);
    /// assert!(result.equals(&Func::from(8.0)));
    /// ```
    pub fn native_unary<A, R, F>(name: &str, func: F) -> Self
        where A: FromFunc,
              R: Into<Self>,
              F: Fn(A) -> R + Send + Sync + 'static
    {
        Self::native(name, 1, move |frame, args| {
            frame.arg::<A>(args, 0).map(|a| func(a)).into()
        })
    }

    /// Wraps a two-argument host function that works on converted values.
    pub fn native_binary<A, B, R, F>(name: &str, func: F) -> Self
        where A: FromFunc,
              B: FromFunc,
              R: Into<Self>,
              F: Fn(A, B) -> R + Send + Sync + 'static
    {
        Self::native(name, 2, move |frame, args| {
            let a = match frame.arg::<A>(args, 0) {
                Ok(a) => a,
                Err(failure) => return failure.into(),
            };
            frame.arg::<B>(args, 1).map(|b| func(a, b)).into()
        })
    }
}
