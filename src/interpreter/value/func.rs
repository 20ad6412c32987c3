use std::{fmt, sync::Arc};

use crate::{
    error::Failure,
    interpreter::value::{frame::Frame, memo::Memo, module::Module, scope::Scope},
};

/// An identifier. Cheap to clone and shared between scopes.
pub type Ident = Arc<str>;

/// The signature of a host-native function.
pub type NativeFn = dyn Fn(&Frame, &[Func]) -> Func + Send + Sync;

/// The universal runtime value.
///
/// Every value can be called with a frame and a list of arguments. Plain
/// values (numbers, strings, booleans, arrays, errors and modules) return
/// themselves. Functions apply their arguments, and expression nodes built by
/// the translator evaluate themselves. Arguments are passed unevaluated; the
/// callee forces them by calling them with no arguments.
///
/// # Example
/// ```
/// use wdte::interpreter::value::{frame::Frame, func::Func};
///
/// let frame = Frame::default();
/// let three = Func::from(3.0);
/// assert!(three.call(&frame, &[Func::from("ignored")]).equals(&three));
/// ```
#[derive(Clone)]
pub enum Func {
    /// A number.
    Number(f64),
    /// A string.
    String(Arc<str>),
    /// A boolean.
    Bool(bool),
    /// An evaluated array.
    Array(Arc<[Func]>),
    /// An error value.
    Error(Arc<Failure>),
    /// An imported module, usable with member access.
    Module(Namespace),
    /// A host-native function.
    Native(Arc<Native>),
    /// A declared function or lambda bound to its defining scope.
    Closure(Arc<Closure>),
    /// A function waiting for the rest of its arguments.
    Partial(Arc<Partial>),
    /// A lambda expression that has not captured a scope yet.
    Lambda(Arc<Lambda>),
    /// An identifier reference.
    Var(Ident),
    /// A member access, `base.name`.
    Member(Arc<Member>),
    /// A function application, `f a b`.
    Application(Arc<Application>),
    /// An argument expression paired with the scope it was written in.
    Scoped(Arc<Scoped>),
    /// An array literal whose elements still need evaluating.
    ArrayLiteral(Arc<[Func]>),
    /// A compound, `(a; b; c)`.
    Compound(Arc<[Func]>),
    /// A chain, `a -> b -- c -| d`.
    Chain(Arc<Chain>),
    /// A switch, `subject { lhs => rhs; }`.
    Switch(Arc<Switch>),
    /// A memoized function body.
    Memo(Arc<Memo>),
    /// A `let` binding. Called on its own, it yields the bound value.
    Let(Arc<Let>),
    /// A collector, `(| a; b)`, yielding its `let` bindings as a module.
    Collector(Arc<[Func]>),
    /// An expression evaluated inside a module, `base.(expr)`.
    MemberExpr(Arc<MemberExpr>),
}

/// How many arguments a native function takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments. Extra arguments are applied to the result.
    Exact(usize),
    /// At least `n` arguments. Extra arguments are passed along.
    AtLeast(usize),
}

impl Arity {
    /// The number of arguments needed before the function runs.
    #[must_use]
    pub const fn required(self) -> usize {
        match self {
            Self::Exact(n) | Self::AtLeast(n) => n,
        }
    }
}

/// Where a partial application keeps the arguments it already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Saved arguments come first: `(f a) b` is `f a b`.
    #[default]
    Prefix,
    /// Saved arguments come last: `(f a) b` is `f b a`.
    Suffix,
}

/// A host-native function.
pub struct Native {
    /// The name used in call paths.
    pub name:  Ident,
    /// How many arguments the function takes.
    pub arity: Arity,
    /// How partial applications of the function order their arguments.
    pub order: Order,
    /// The implementation.
    pub func:  Box<NativeFn>,
}

/// A function definition: a name, parameters and a body.
#[derive(Debug)]
pub struct Lambda {
    /// The function's own name, bound inside its body for recursion.
    pub name:   Ident,
    /// The declared parameters, in order.
    pub params: Arc<[Ident]>,
    /// The body expression.
    pub body:   Func,
}

/// A [`Lambda`] closed over the scope it was defined in.
#[derive(Debug)]
pub struct Closure {
    /// The definition.
    pub lambda: Arc<Lambda>,
    /// The defining scope.
    pub scope:  Scope,
}

/// A partially applied function.
#[derive(Debug)]
pub struct Partial {
    /// The function being applied.
    pub func:  Func,
    /// The arguments supplied so far, in order.
    pub saved: Vec<Func>,
    /// The number of arguments `func` needs in total.
    pub arity: usize,
    /// Whether `saved` goes before or after later arguments.
    pub order: Order,
}

impl Partial {
    /// The number of arguments still missing.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.arity.saturating_sub(self.saved.len())
    }

    /// Combines the saved arguments with `args` in call order.
    #[must_use]
    pub fn combine(&self, args: &[Func]) -> Vec<Func> {
        match self.order {
            Order::Prefix => self.saved.iter().chain(args).cloned().collect(),
            Order::Suffix => args.iter().chain(&self.saved).cloned().collect(),
        }
    }
}

/// A member access, `base.name`.
#[derive(Debug)]
pub struct Member {
    /// The expression producing the module.
    pub base: Func,
    /// The member to look up.
    pub name: Ident,
}

/// An expression evaluated with a module's members in scope.
#[derive(Debug)]
pub struct MemberExpr {
    /// The expression producing the module.
    pub base: Func,
    /// The expression to evaluate.
    pub expr: Func,
}

/// What a `let` or a slot binds a value to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// The whole value.
    Name(Ident),
    /// The leading elements of an array, one name per element.
    Array(Arc<[Ident]>),
}

/// A `let` binding inside a compound.
#[derive(Debug)]
pub struct Let {
    /// The names to bind.
    pub pattern: Pattern,
    /// The expression producing the value. It is evaluated once, when the
    /// binding is reached.
    pub expr:    Func,
}

/// A function application, `func args...`.
#[derive(Debug)]
pub struct Application {
    /// The expression producing the function.
    pub func: Func,
    /// The unevaluated arguments.
    pub args: Vec<Func>,
}

/// An expression evaluated in a fixed scope.
#[derive(Debug)]
pub struct Scoped {
    /// The expression.
    pub func:  Func,
    /// The scope it was written in.
    pub scope: Scope,
}

/// How a chain segment is linked to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// `->`: the segment's result becomes the running value.
    Plain,
    /// `--`: the segment runs, but the running value is kept.
    Ignored,
    /// `-|`: the segment only runs when the running value is an error.
    Recover,
}

/// One segment of a [`Chain`].
#[derive(Debug)]
pub struct ChainPiece {
    /// The segment expression.
    pub expr: Func,
    /// How the segment is linked to the one before it.
    pub link: Link,
    /// A pattern bound to the segment's output for the rest of the chain.
    pub slot: Option<Pattern>,
}

/// A chain of segments threading a running value.
#[derive(Debug)]
pub struct Chain {
    /// The segments in source order. The first segment's link is ignored.
    pub pieces: Vec<ChainPiece>,
}

/// A switch over a subject.
#[derive(Debug)]
pub struct Switch {
    /// The expression producing the subject.
    pub subject: Func,
    /// The `(lhs, rhs)` cases in source order.
    pub cases:   Vec<(Func, Func)>,
}

/// A module value together with the scope its members are resolved in.
#[derive(Clone)]
pub struct Namespace {
    /// The module.
    pub module: Arc<Module>,
    /// A scope whose innermost level is `module`.
    pub scope:  Scope,
}

impl Func {
    /// Wraps a host-native callable with a fixed arity.
    ///
    /// Calling the result with fewer than `arity` arguments yields a partial
    /// application; extra arguments are applied to the function's result.
    pub fn native<F>(name: &str, arity: usize, func: F) -> Self
        where F: Fn(&Frame, &[Self]) -> Self + Send + Sync + 'static
    {
        Self::native_with(name, Arity::Exact(arity), Order::Prefix, func)
    }

    /// Wraps a host-native callable whose partial applications keep their
    /// arguments last, so that `5 -> f 2` calls `f 5 2`.
    pub fn native_reversed<F>(name: &str, arity: usize, func: F) -> Self
        where F: Fn(&Frame, &[Self]) -> Self + Send + Sync + 'static
    {
        Self::native_with(name, Arity::Exact(arity), Order::Suffix, func)
    }

    /// Wraps a host-native callable with an explicit [`Arity`] and [`Order`].
    pub fn native_with<F>(name: &str, arity: Arity, order: Order, func: F) -> Self
        where F: Fn(&Frame, &[Self]) -> Self + Send + Sync + 'static
    {
        Self::Native(Arc::new(Native { name: name.into(),
                                       arity,
                                       order,
                                       func: Box::new(func) }))
    }

    /// Tests whether this is an error value.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the failure carried by an error value.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Error(failure) => Some(failure.as_ref()),
            _ => None,
        }
    }

    /// Splits error values from everything else.
    pub fn into_result(self) -> Result<Self, Arc<Failure>> {
        match self {
            Self::Error(failure) => Err(failure),
            other => Ok(other),
        }
    }

    /// Tests whether this is a plain value that calls to itself.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self,
                 Self::Number(_)
                 | Self::String(_)
                 | Self::Bool(_)
                 | Self::Array(_)
                 | Self::Error(_)
                 | Self::Module(_))
    }

    /// Returns a short name for the kind of value, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Array(_) => "array",
            Self::Error(_) => "error",
            Self::Module(_) => "module",
            Self::Native(_) | Self::Closure(_) | Self::Partial(_) => "function",
            _ => "expression",
        }
    }

    /// Pins an argument expression to the scope it was written in.
    ///
    /// Plain values and already bound functions are returned as they are.
    #[must_use]
    pub fn scoped(&self, scope: &Scope) -> Self {
        match self {
            Self::Number(_)
            | Self::String(_)
            | Self::Bool(_)
            | Self::Array(_)
            | Self::Error(_)
            | Self::Module(_)
            | Self::Native(_)
            | Self::Closure(_)
            | Self::Partial(_)
            | Self::Scoped(_) => self.clone(),
            _ => Self::Scoped(Arc::new(Scoped { func:  self.clone(),
                                                scope: scope.clone(), })),
        }
    }

    /// Returns an address identifying shared payloads, if there is one.
    pub(crate) fn identity(&self) -> Option<usize> {
        fn addr<T: ?Sized>(arc: &Arc<T>) -> usize {
            Arc::as_ptr(arc).cast::<()>() as usize
        }

        match self {
            Self::Number(_) | Self::Bool(_) | Self::Var(_) => None,
            Self::String(s) => Some(addr(s)),
            Self::Array(a) | Self::ArrayLiteral(a) | Self::Compound(a) | Self::Collector(a) => Some(addr(a)),
            Self::Error(e) => Some(addr(e)),
            Self::Module(ns) => Some(addr(&ns.module)),
            Self::Native(f) => Some(addr(f)),
            Self::Closure(f) => Some(addr(f)),
            Self::Partial(f) => Some(addr(f)),
            Self::Lambda(f) => Some(addr(f)),
            Self::Member(f) => Some(addr(f)),
            Self::Application(f) => Some(addr(f)),
            Self::Scoped(f) => Some(addr(f)),
            Self::Chain(f) => Some(addr(f)),
            Self::Switch(f) => Some(addr(f)),
            Self::Memo(f) => Some(addr(f)),
            Self::Let(f) => Some(addr(f)),
            Self::MemberExpr(f) => Some(addr(f)),
        }
    }

    /// Compares two values.
    ///
    /// Numbers, strings, booleans and arrays compare structurally. Everything
    /// else is only equal to itself.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            },
            (Self::Var(a), Self::Var(b)) => a == b,
            _ => self.identity().is_some() && self.identity() == other.identity(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            },
            Self::Error(failure) => write!(f, "error: {failure}"),
            Self::Module(_) => f.write_str("<module>"),
            Self::Native(native) => write!(f, "<builtin {}>", native.name),
            Self::Closure(closure) => write!(f, "<function {}>", closure.lambda.name),
            Self::Partial(partial) => write!(f, "<partial {}>", partial.func),
            Self::Lambda(lambda) => write!(f, "<lambda {}>", lambda.name),
            Self::Var(id) => f.write_str(id),
            _ => f.write_str("<expression>"),
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) | Self::ArrayLiteral(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Compound(items) => f.debug_tuple("Compound").field(items).finish(),
            Self::Collector(items) => f.debug_tuple("Collector").field(items).finish(),
            Self::Let(binding) => f.debug_tuple("Let").field(&binding.pattern).field(&binding.expr).finish(),
            Self::MemberExpr(member) => write!(f, "{:?}.({:?})", member.base, member.expr),
            Self::Application(app) => f.debug_tuple("Application")
                                       .field(&app.func)
                                       .field(&app.args)
                                       .finish(),
            Self::Chain(chain) => f.debug_tuple("Chain").field(&chain.pieces).finish(),
            Self::Switch(switch) => f.debug_tuple("Switch").field(&switch.subject).field(&switch.cases).finish(),
            Self::Member(member) => write!(f, "{:?}.{}", member.base, member.name),
            Self::Scoped(scoped) => f.debug_tuple("Scoped").field(&scoped.func).finish(),
            Self::Memo(memo) => f.debug_tuple("Memo").field(memo).finish(),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Native")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .field("order", &self.order)
         .finish_non_exhaustive()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace").field("module", &self.module).finish_non_exhaustive()
    }
}
