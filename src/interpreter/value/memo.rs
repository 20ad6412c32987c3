use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Mutex, PoisonError},
};

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        frame::Frame,
        func::{Func, Ident},
    },
};

/// A cache key built from a forced argument value.
///
/// Plain values are keyed by content. Everything else is keyed by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoKey {
    /// A number.
    Number(OrderedFloat<f64>),
    /// A string.
    String(Arc<str>),
    /// A boolean.
    Bool(bool),
    /// An array, keyed element by element.
    Array(Vec<MemoKey>),
    /// Any other value, keyed by the address of its shared payload.
    Identity(IdentityKey),
}

/// Holds a value so that its address stays valid for as long as the key is
/// cached, and no later allocation can reuse it.
#[derive(Debug, Clone)]
pub struct IdentityKey(Func);

impl PartialEq for IdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.identity() == other.0.identity()
    }
}

impl Eq for IdentityKey {}

impl Hash for IdentityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.identity().hash(state);
    }
}

impl From<&Func> for MemoKey {
    fn from(value: &Func) -> Self {
        match value {
            Func::Number(n) => Self::Number(OrderedFloat(*n)),
            Func::String(s) => Self::String(s.clone()),
            Func::Bool(b) => Self::Bool(*b),
            Func::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            other => Self::Identity(IdentityKey(other.clone())),
        }
    }
}

/// A trie level: one map per argument position.
#[derive(Default)]
struct Trie {
    value:    Option<Func>,
    children: HashMap<MemoKey, Trie>,
}

impl Trie {
    fn get(&self, keys: &[MemoKey]) -> Option<&Func> {
        match keys.split_first() {
            None => self.value.as_ref(),
            Some((key, rest)) => self.children.get(key)?.get(rest),
        }
    }

    fn insert(&mut self, keys: Vec<MemoKey>, value: Func) {
        let mut node = self;
        for key in keys {
            node = node.children.entry(key).or_default();
        }
        node.value = Some(value);
    }

    fn len(&self) -> usize {
        usize::from(self.value.is_some()) + self.children.values().map(Self::len).sum::<usize>()
    }
}

/// A function body whose results are cached by argument values.
///
/// The arguments are looked up in the calling frame's scope and forced
/// before the cache is consulted. The cache lives as long as the memo
/// itself, which is one per declaration. Error results are never cached.
pub struct Memo {
    body:   Func,
    params: Arc<[Ident]>,
    cache:  Mutex<Trie>,
}

impl Memo {
    /// Wraps `body`, keying its results by the values of `params`.
    #[must_use]
    pub fn new(body: Func, params: Arc<[Ident]>) -> Self {
        Self { body,
               params,
               cache: Mutex::new(Trie::default()) }
    }

    /// Returns the number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Tests whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn call(&self, frame: &Frame, args: &[Func]) -> Func {
        let mut values = Vec::with_capacity(self.params.len());
        for param in self.params.iter() {
            let Some(bound) = frame.scope().get(param) else {
                return frame.error(RuntimeError::UnknownIdentifier { name: param.to_string() });
            };
            let value = bound.call(frame, &[]);
            if value.is_error() {
                return value;
            }
            values.push(value);
        }

        let keys: Vec<MemoKey> = values.iter().map(MemoKey::from).collect();
        let cached = self.cache
                         .lock()
                         .unwrap_or_else(PoisonError::into_inner)
                         .get(&keys)
                         .cloned();

        let result = if let Some(hit) = cached {
            trace!(?keys, "memo hit");
            hit
        } else {
            trace!(?keys, "memo miss");
            let scope = frame.scope().add_all(self.params.iter().cloned().zip(values));
            let result = self.body.call(&frame.with_scope(scope), &[]);
            if !result.is_error() {
                self.cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(keys, result.clone());
            }
            result
        };

        if args.is_empty() || result.is_error() {
            result
        } else {
            result.call(frame, args)
        }
    }
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
         .field("params", &self.params)
         .field("body", &self.body)
         .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_by_content() {
        let a = Func::from(vec![Func::from(1.0), Func::from("x")]);
        let b = Func::from(vec![Func::from(1.0), Func::from("x")]);
        assert_eq!(MemoKey::from(&a), MemoKey::from(&b));
        assert_ne!(MemoKey::from(&Func::from(1.0)), MemoKey::from(&Func::from(2.0)));
    }

    #[test]
    fn trie_distinguishes_positions() {
        let mut trie = Trie::default();
        let one = MemoKey::from(&Func::from(1.0));
        let two = MemoKey::from(&Func::from(2.0));

        trie.insert(vec![one.clone(), two.clone()], Func::from("a"));
        assert!(trie.get(&[one.clone(), two.clone()]).is_some());
        assert!(trie.get(&[two, one.clone()]).is_none());
        assert!(trie.get(&[one]).is_none());
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn identity_keys_hold_their_value() {
        let first = MemoKey::from(&Func::native("f", 1, |_, args| args[0].clone()));
        let second = MemoKey::from(&Func::native("f", 1, |_, args| args[0].clone()));
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }
}
