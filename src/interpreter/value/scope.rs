use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::interpreter::value::{
    func::{Func, Ident, Namespace},
    module::Module,
};

/// A persistent chain of identifier bindings.
///
/// Adding bindings never changes an existing scope. It returns a new scope
/// whose parent is the old one, so scopes can be captured by closures and
/// shared between threads freely. Lookup walks from the innermost level
/// outwards.
///
/// # Example
/// ```
/// use wdte::interpreter::value::{func::Func, scope::Scope};
///
/// let outer = Scope::new().add("x", Func::from(1.0));
/// let inner = outer.add("x", Func::from(2.0));
///
/// assert!(inner.get("x").unwrap().equals(&Func::from(2.0)));
/// assert!(outer.get("x").unwrap().equals(&Func::from(1.0)));
/// assert!(inner.get("y").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Scope(Option<Arc<Level>>);

struct Level {
    bindings: Bindings,
    parent:   Scope,
}

enum Bindings {
    One(Ident, Func),
    Many(IndexMap<Ident, Func>),
    Module(Arc<Module>),
    Namespace(Namespace),
}

impl Scope {
    /// Creates an empty root scope.
    #[must_use]
    pub const fn new() -> Self {
        Self(None)
    }

    fn push(&self, bindings: Bindings) -> Self {
        Self(Some(Arc::new(Level { bindings,
                                   parent: self.clone() })))
    }

    /// Returns a child scope binding `id` to `value`.
    #[must_use]
    pub fn add(&self, id: impl Into<Ident>, value: Func) -> Self {
        self.push(Bindings::One(id.into(), value))
    }

    /// Returns a child scope with all of `bindings` in a single level.
    ///
    /// Later duplicates replace earlier ones.
    #[must_use]
    pub fn add_all<I, K>(&self, bindings: I) -> Self
        where I: IntoIterator<Item = (K, Func)>,
              K: Into<Ident>
    {
        let map = bindings.into_iter()
                          .map(|(id, value)| (id.into(), value))
                          .collect::<IndexMap<_, _>>();
        if map.is_empty() {
            return self.clone();
        }
        self.push(Bindings::Many(map))
    }

    /// Returns a child scope exposing the functions and imports of `module`.
    ///
    /// Declared functions found through this level are closed over it, so
    /// they can see each other and themselves.
    #[must_use]
    pub fn with_module(&self, module: Arc<Module>) -> Self {
        self.push(Bindings::Module(module))
    }

    /// Returns a child scope exposing the members of `namespace`.
    ///
    /// Unlike [`Scope::with_module`], members keep resolving in the
    /// namespace's own scope, so functions of an imported module still see
    /// that module's imports rather than the caller's bindings.
    #[must_use]
    pub fn with_namespace(&self, namespace: Namespace) -> Self {
        self.push(Bindings::Namespace(namespace))
    }

    /// Returns the enclosing scope. The root's parent is itself.
    #[must_use]
    pub fn parent(&self) -> Self {
        self.0.as_ref().map_or_else(Self::new, |level| level.parent.clone())
    }

    /// Tests whether the scope binds nothing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Looks `id` up, walking outwards from the innermost level.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Func> {
        let mut current = self;
        while let Some(level) = &current.0 {
            match &level.bindings {
                Bindings::One(name, value) if &**name == id => return Some(value.clone()),
                Bindings::One(..) => {},
                Bindings::Many(map) => {
                    if let Some(value) = map.get(id) {
                        return Some(value.clone());
                    }
                },
                Bindings::Module(module) => {
                    if let Some(value) = module.resolve(id, current) {
                        return Some(value);
                    }
                },
                Bindings::Namespace(ns) => {
                    if let Some(value) = ns.module.resolve(id, &ns.scope) {
                        return Some(value);
                    }
                },
            }
            current = &level.parent;
        }
        None
    }

    /// Returns every visible identifier, innermost first, without duplicates.
    #[must_use]
    pub fn known(&self) -> Vec<Ident> {
        let mut known: Vec<Ident> = Vec::new();
        let mut push = |id: &Ident| {
            if !known.contains(id) {
                known.push(id.clone());
            }
        };

        let mut current = self;
        while let Some(level) = &current.0 {
            match &level.bindings {
                Bindings::One(name, _) => push(name),
                Bindings::Many(map) => map.keys().for_each(&mut push),
                Bindings::Module(module) => module.names().for_each(&mut push),
                Bindings::Namespace(ns) => ns.module.names().for_each(&mut push),
            }
            current = &level.parent;
        }
        known
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scope").field(&self.known()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_does_not_touch_the_parent() {
        let root = Scope::new().add("a", Func::from(1.0));
        let child = root.add("a", Func::from(2.0));

        assert!(matches!(root.get("a"), Some(Func::Number(n)) if n == 1.0));
        assert!(matches!(child.get("a"), Some(Func::Number(n)) if n == 2.0));
    }

    #[test]
    fn add_all_keeps_the_last_duplicate() {
        let scope = Scope::new().add_all([("a", Func::from(1.0)), ("a", Func::from(3.0))]);
        assert!(matches!(scope.get("a"), Some(Func::Number(n)) if n == 3.0));
    }

    #[test]
    fn known_lists_innermost_first() {
        let scope = Scope::new().add("a", Func::from(1.0))
                                .add("b", Func::from(2.0))
                                .add("a", Func::from(3.0));
        let known: Vec<_> = scope.known().iter().map(ToString::to_string).collect();
        assert_eq!(known, vec!["a", "b"]);
    }

    #[test]
    fn parent_of_root_is_empty() {
        assert!(Scope::new().parent().is_empty());
        assert!(Scope::new().add("a", Func::from(1.0)).parent().is_empty());
    }

    #[test]
    fn namespace_members_shadow_outer_bindings() {
        let module = Arc::new(Module::new().with("x", Func::from(2.0)));
        let namespace = Namespace { module: module.clone(),
                                    scope:  Scope::new().with_module(module), };
        let scope = Scope::new().add("x", Func::from(1.0))
                                .add("y", Func::from(3.0))
                                .with_namespace(namespace);

        assert!(matches!(scope.get("x"), Some(Func::Number(n)) if n == 2.0));
        assert!(matches!(scope.get("y"), Some(Func::Number(n)) if n == 3.0));
    }
}
