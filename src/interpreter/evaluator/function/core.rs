use crate::interpreter::{
    evaluator::function::{arithmetic, array, comparison, logic, print, raise},
    value::{
        frame::{EvalResult, Frame},
        func::{Arity, Func, Order},
        scope::Scope,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the frame it runs in and its unevaluated arguments. It
/// forces the arguments it needs and returns either a value or the failure
/// that becomes an error value.
type BuiltinFn = fn(&Frame, &[Func]) -> EvalResult<Func>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// The names of every built-in function in the prelude.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "+"     => { arity: Arity::AtLeast(2), func: arithmetic::add },
    "-"     => { arity: Arity::Exact(2),   func: arithmetic::sub },
    "*"     => { arity: Arity::AtLeast(2), func: arithmetic::mul },
    "/"     => { arity: Arity::Exact(2),   func: arithmetic::div },
    "%"     => { arity: Arity::Exact(2),   func: arithmetic::rem },
    "=="    => { arity: Arity::Exact(2),   func: comparison::equal },
    "<"     => { arity: Arity::Exact(2),   func: comparison::less },
    ">"     => { arity: Arity::Exact(2),   func: comparison::greater },
    "<="    => { arity: Arity::Exact(2),   func: comparison::less_equal },
    ">="    => { arity: Arity::Exact(2),   func: comparison::greater_equal },
    "!"     => { arity: Arity::Exact(1),   func: logic::not },
    "&&"    => { arity: Arity::AtLeast(2), func: logic::and },
    "||"    => { arity: Arity::AtLeast(2), func: logic::or },
    "at"    => { arity: Arity::Exact(2),   func: array::at },
    "len"   => { arity: Arity::Exact(1),   func: array::len },
    "error" => { arity: Arity::Exact(1),   func: raise::error },
    "print" => { arity: Arity::AtLeast(1), func: print::print },
}

/// Builds the scope every script runs in by default.
///
/// It binds each function of [`BUILTIN_FUNCTIONS`] plus the values `true`,
/// `false` and `default`. `default` is `true`, so it matches any subject when
/// used as the last case of a switch.
///
/// # Example
/// ```
/// use wdte::interpreter::{evaluator::{BUILTIN_FUNCTIONS, prelude}, value::func::Func};
///
/// let scope = prelude();
/// for name in BUILTIN_FUNCTIONS {
///     assert!(scope.get(name).is_some());
/// }
/// assert!(scope.get("default").unwrap().equals(&Func::from(true)));
/// ```
#[must_use]
pub fn prelude() -> Scope {
    let builtins = BUILTIN_TABLE.iter().map(|def| {
                                           let func = def.func;
                                           let native =
                                               Func::native_with(def.name, def.arity, Order::Prefix, move |frame, args| {
                                                   func(frame, args).unwrap_or_else(Func::from)
                                               });
                                           (def.name, native)
                                       });

    let values = [("true", Func::from(true)), ("false", Func::from(false)), ("default", Func::from(true))];

    Scope::new().add_all(builtins.chain(values))
}

/// Forces every argument, stopping at the first error.
pub(crate) fn force_all(frame: &Frame, args: &[Func]) -> EvalResult<Vec<Func>> {
    args.iter().map(|arg| arg.call(frame, &[]).into_result()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_unique() {
        for (i, name) in BUILTIN_FUNCTIONS.iter().enumerate() {
            assert!(!BUILTIN_FUNCTIONS[i + 1..].contains(name), "duplicate builtin {name}");
        }
    }

    #[test]
    fn builtins_curry() {
        let frame = Frame::new(prelude());
        let minus = frame.scope().get("-").unwrap();

        let minus_ten = minus.call(&frame, &[Func::from(10.0)]);
        assert!(matches!(minus_ten, Func::Partial(_)));
        assert!(minus_ten.call(&frame, &[Func::from(4.0)]).equals(&Func::from(6.0)));
    }
}
