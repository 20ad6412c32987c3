use std::sync::Arc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::over_applied,
        value::{
            frame::Frame,
            func::{Func, Ident, Let, Namespace, Pattern},
            module::Module,
        },
    },
};

impl Pattern {
    /// Matches `value` against the pattern, returning the bindings it makes.
    ///
    /// A name binds the whole value. An array pattern binds the leading
    /// elements of an array in order and ignores the rest.
    ///
    /// # Errors
    /// Returns an error value if an array pattern meets something other than
    /// an array, or an array with fewer elements than names.
    pub(crate) fn bind(&self, value: &Func, frame: &Frame) -> Result<Vec<(Ident, Func)>, Func> {
        match self {
            Self::Name(name) => Ok(vec![(name.clone(), value.clone())]),
            Self::Array(names) => {
                let Func::Array(items) = value else {
                    return Err(frame.error(RuntimeError::TypeMismatch { expected: "array",
                                                                        found:    value.type_name()
                                                                                       .to_string(), }));
                };
                if items.len() < names.len() {
                    return Err(frame.error(RuntimeError::IndexOutOfRange { index: items.len(),
                                                                           len:   items.len(), }));
                }
                Ok(names.iter().cloned().zip(items.iter().cloned()).collect())
            },
        }
    }
}

impl Let {
    /// Evaluates the bound expression in `frame` and matches it against the
    /// pattern.
    fn bind(&self, frame: &Frame) -> Result<(Func, Vec<(Ident, Func)>), Func> {
        let value = self.expr.call(frame, &[]);
        if value.is_error() {
            return Err(value);
        }
        let bound = self.pattern.bind(&value, frame)?;
        Ok((value, bound))
    }

    /// A `let` evaluated outside of a compound yields its value.
    pub(crate) fn call(&self, frame: &Frame, args: &[Func]) -> Func {
        match self.bind(frame) {
            Ok((value, _)) => over_applied(value, frame, args),
            Err(error) => error,
        }
    }
}

/// The outcome of running the items of a compound in order.
struct Evaluated {
    /// The value of the last item, or the first error met.
    last:  Func,
    /// Every binding made by a `let`, in order.
    bound: Vec<(Ident, Func)>,
}

/// Runs `exprs` in order. Each `let` extends the scope of the items after it.
/// Evaluation stops at the first error.
fn evaluate(exprs: &[Func], frame: &Frame) -> Evaluated {
    let mut scope = frame.scope().clone();
    let mut bound = Vec::new();
    let mut last = Func::from(Vec::new());

    for expr in exprs {
        if let Err(failure) = frame.check() {
            last = failure.into();
            break;
        }

        let inner = frame.with_scope(scope.clone());
        last = match expr {
            Func::Let(binding) => match binding.bind(&inner) {
                Ok((value, names)) => {
                    scope = scope.add_all(names.iter().cloned());
                    bound.extend(names);
                    value
                },
                Err(error) => error,
            },
            other => other.call(&inner, &[]),
        };

        if last.is_error() {
            break;
        }
    }

    Evaluated { last, bound }
}

/// Evaluates a compound, `(a; b; c)`, yielding its last item.
pub(crate) fn call_compound(exprs: &[Func], frame: &Frame, args: &[Func]) -> Func {
    over_applied(evaluate(exprs, frame).last, frame, args)
}

/// Evaluates a collector, `(| a; b)`, yielding a module of its `let`
/// bindings.
pub(crate) fn call_collector(exprs: &[Func], frame: &Frame, args: &[Func]) -> Func {
    let Evaluated { last, bound } = evaluate(exprs, frame);
    if last.is_error() {
        return last;
    }

    let mut module = Module::new();
    for (name, value) in bound {
        module.insert(name, value);
    }
    let module = Arc::new(module);
    let collected = Func::Module(Namespace { module: module.clone(),
                                             scope:  frame.scope().with_module(module), });
    over_applied(collected, frame, args)
}
