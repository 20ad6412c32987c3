use std::sync::Arc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::compound::{call_collector, call_compound},
        value::{
            frame::Frame,
            func::{Application, Arity, Closure, Func, Member, MemberExpr, Native, Order, Partial},
        },
    },
};

impl Func {
    /// Calls this value with `args` in the context of `frame`.
    ///
    /// Plain values return themselves whatever the arguments. Functions
    /// called with fewer arguments than they need return a partial
    /// application; called with more, they apply the surplus to their
    /// result. Expression nodes evaluate themselves against the frame's
    /// scope.
    ///
    /// Errors never unwind: a failing call returns an error value.
    ///
    /// # Example
    /// ```
    /// use wdte::interpreter::{
    ///     evaluator::prelude,
    ///     value::{frame::Frame, func::Func},
    /// };
    ///
    /// let frame = Frame::new(prelude());
    /// let add = frame.scope().get("+").unwrap();
    ///
    /// let add_two = add.call(&frame, &[Func::from(2.0)]);
    /// let five = add_two.call(&frame, &[Func::from(3.0)]);
    /// assert!(five.equals(&Func::from(5.0)));
    /// ```
    #[must_use]
    pub fn call(&self, frame: &Frame, args: &[Self]) -> Self {
        match self {
            Self::Number(_)
            | Self::String(_)
            | Self::Bool(_)
            | Self::Array(_)
            | Self::Error(_)
            | Self::Module(_) => self.clone(),
            Self::Native(native) => self.call_native(native, frame, args),
            Self::Closure(closure) => self.call_closure(closure, frame, args),
            Self::Partial(partial) => self.call_partial(partial, frame, args),
            Self::Lambda(lambda) => {
                let closure = Self::Closure(Arc::new(Closure { lambda: lambda.clone(),
                                                               scope:  frame.scope().clone(), }));
                if args.is_empty() {
                    closure
                } else {
                    closure.call(frame, args)
                }
            },
            Self::Var(id) => match frame.scope().get(id) {
                Some(func) => func.call(frame, args),
                None => frame.error(RuntimeError::UnknownIdentifier { name: id.to_string() }),
            },
            Self::Member(member) => call_member(member, frame, args),
            Self::Application(app) => call_application(app, frame, args),
            Self::Scoped(scoped) => scoped.func.call(&frame.with_scope(scoped.scope.clone()), args),
            Self::ArrayLiteral(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items.iter() {
                    let value = item.call(frame, &[]);
                    if value.is_error() {
                        return value;
                    }
                    values.push(value);
                }
                Self::from(values)
            },
            Self::Compound(exprs) => call_compound(exprs, frame, args),
            Self::Chain(chain) => chain.call(frame, args),
            Self::Switch(switch) => switch.call(frame, args),
            Self::Memo(memo) => memo.call(frame, args),
            Self::Let(binding) => binding.call(frame, args),
            Self::Collector(exprs) => call_collector(exprs, frame, args),
            Self::MemberExpr(member) => call_member_expr(member, frame, args),
        }
    }

    fn call_native(&self, native: &Native, frame: &Frame, args: &[Self]) -> Self {
        let required = native.arity.required();
        if args.len() < required {
            return under_applied(self, args, required, native.order);
        }

        let inner = frame.enter(&native.name);
        if let Err(failure) = inner.check() {
            return failure.into();
        }

        match native.arity {
            Arity::Exact(n) => over_applied((native.func)(&inner, &args[..n]), frame, &args[n..]),
            Arity::AtLeast(_) => (native.func)(&inner, args),
        }
    }

    fn call_closure(&self, closure: &Closure, frame: &Frame, args: &[Self]) -> Self {
        let lambda = &closure.lambda;
        let arity = lambda.params.len();
        if args.len() < arity {
            return under_applied(self, args, arity, Order::Prefix);
        }

        let inner = frame.sub(&lambda.name);
        if let Err(failure) = inner.check() {
            return failure.into();
        }

        let scope = closure.scope
                           .add(lambda.name.clone(), self.clone())
                           .add_all(lambda.params.iter().cloned().zip(args.iter().cloned()));
        let result = lambda.body.call(&inner.with_scope(scope), &[]);

        over_applied(result, frame, &args[arity..])
    }

    fn call_partial(&self, partial: &Partial, frame: &Frame, args: &[Self]) -> Self {
        if args.is_empty() {
            return self.clone();
        }

        let all = partial.combine(args);
        if all.len() < partial.arity {
            return Self::Partial(Arc::new(Partial { func:  partial.func.clone(),
                                                    saved: all,
                                                    arity: partial.arity,
                                                    order: partial.order, }));
        }

        partial.func.call(frame, &all)
    }
}

/// Returns `func` itself when no arguments were given, or a partial
/// application saving `args` otherwise.
pub(crate) fn under_applied(func: &Func, args: &[Func], arity: usize, order: Order) -> Func {
    if args.is_empty() {
        return func.clone();
    }

    Func::Partial(Arc::new(Partial { func: func.clone(),
                                     saved: args.to_vec(),
                                     arity,
                                     order }))
}

/// Applies arguments left over after a function consumed its own to the
/// function's result. Error results are returned as they are.
pub(crate) fn over_applied(result: Func, frame: &Frame, rest: &[Func]) -> Func {
    if rest.is_empty() || result.is_error() {
        result
    } else {
        result.call(frame, rest)
    }
}

fn call_member(member: &Member, frame: &Frame, args: &[Func]) -> Func {
    match member.base.call(frame, &[]) {
        Func::Module(namespace) => match namespace.module.resolve(&member.name, &namespace.scope) {
            Some(func) => func.call(frame, args),
            None => frame.error(RuntimeError::UnknownMember { name: member.name.to_string() }),
        },
        error @ Func::Error(_) => error,
        other => frame.error(RuntimeError::NotAModule { name:  member.name.to_string(),
                                                        found: other.type_name().to_string(), }),
    }
}

fn call_member_expr(member: &MemberExpr, frame: &Frame, args: &[Func]) -> Func {
    match member.base.call(frame, &[]) {
        Func::Module(namespace) => {
            let scope = frame.scope().with_namespace(namespace);
            member.expr.call(&frame.with_scope(scope), args)
        },
        error @ Func::Error(_) => error,
        other => frame.error(RuntimeError::NotAModule { name:  "(...)".to_string(),
                                                        found: other.type_name().to_string(), }),
    }
}

fn call_application(app: &Application, frame: &Frame, args: &[Func]) -> Func {
    let func = app.func.call(frame, &[]);
    if func.is_error() {
        return func;
    }

    let own = app.args.iter().map(|arg| arg.scoped(frame.scope()));
    let all = match &func {
        // `5 -> f 2` treats `f 2` as a partial application of `f`.
        Func::Native(native) if native.order == Order::Suffix => {
            args.iter().cloned().chain(own).collect::<Vec<_>>()
        },
        _ => own.chain(args.iter().cloned()).collect(),
    };

    func.call(frame, &all)
}
