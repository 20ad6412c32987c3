use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        frame::Frame,
        func::{Closure, Func, Ident, Namespace},
        scope::Scope,
    },
};

/// The unit of translation: declared functions plus imported modules.
///
/// A script translates into a module, and hosts build modules by hand to
/// expose native functions to scripts through imports.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use wdte::interpreter::value::{frame::Frame, func::Func, module::Module};
///
/// let mut math = Module::new();
/// math.insert("pi", Func::from(std::f64::consts::PI));
/// let math = Arc::new(math);
///
/// let pi = math.call(&Frame::default(), "pi", &[]);
/// assert!(pi.equals(&Func::from(std::f64::consts::PI)));
/// ```
#[derive(Default)]
pub struct Module {
    imports: IndexMap<Ident, Arc<Module>>,
    funcs:   IndexMap<Ident, Func>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `func` under `name`, returning any previous declaration.
    pub fn insert(&mut self, name: impl Into<Ident>, func: Func) -> Option<Func> {
        self.funcs.insert(name.into(), func)
    }

    /// Builder form of [`Module::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<Ident>, func: Func) -> Self {
        self.insert(name, func);
        self
    }

    /// Records `module` under the import alias `alias`.
    pub fn import(&mut self, alias: impl Into<Ident>, module: Arc<Self>) -> Option<Arc<Self>> {
        self.imports.insert(alias.into(), module)
    }

    /// Returns the declaration named `name`, as stored.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    /// Returns the module imported under `alias`.
    #[must_use]
    pub fn imported(&self, alias: &str) -> Option<&Arc<Self>> {
        self.imports.get(alias)
    }

    /// Iterates over the declared functions in declaration order.
    pub fn funcs(&self) -> impl Iterator<Item = (&Ident, &Func)> {
        self.funcs.iter()
    }

    /// Iterates over the import aliases in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = (&Ident, &Arc<Self>)> {
        self.imports.iter()
    }

    /// Iterates over every name the module exposes.
    pub fn names(&self) -> impl Iterator<Item = &Ident> {
        self.funcs.keys().chain(self.imports.keys())
    }

    /// Resolves `id` as seen from `namespace`, a scope whose innermost level
    /// is this module.
    ///
    /// Declared lambdas are closed over `namespace`. Imports resolve to module
    /// values sharing the parent of `namespace`.
    pub(crate) fn resolve(&self, id: &str, namespace: &Scope) -> Option<Func> {
        if let Some(func) = self.funcs.get(id) {
            return Some(match func {
                            Func::Lambda(lambda) => {
                                Func::Closure(Arc::new(Closure { lambda: lambda.clone(),
                                                                 scope:  namespace.clone(), }))
                            },
                            other => other.clone(),
                        });
        }

        self.imports.get(id).map(|module| {
                                Func::Module(Namespace { module: module.clone(),
                                                         scope:  namespace.parent()
                                                                          .with_module(module.clone()), })
                            })
    }

    /// Calls the declaration `name` with `args`.
    ///
    /// The module's namespace is layered over the frame's scope, so the
    /// frame decides which built-ins the module sees.
    pub fn call(self: &Arc<Self>, frame: &Frame, name: &str, args: &[Func]) -> Func {
        let namespace = frame.scope().with_module(self.clone());
        match self.resolve(name, &namespace) {
            Some(func) => func.call(&frame.with_scope(namespace), args),
            None => frame.error(RuntimeError::UnknownIdentifier { name: name.to_string() }),
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
         .field("imports", &self.imports.keys().collect::<Vec<_>>())
         .field("funcs", &self.funcs.keys().collect::<Vec<_>>())
         .finish()
    }
}
