use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use tracing::debug;

use crate::{
    error::{Failure, RuntimeError},
    interpreter::value::{
        func::{Func, Ident},
        scope::Scope,
    },
};

/// Result type for evaluation steps that may end in an error value.
pub type EvalResult<T> = Result<T, Arc<Failure>>;

/// The default limit on nested calls of script functions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// The names of the functions active at some point of an evaluation.
#[derive(Clone, Default)]
pub struct CallPath(Option<Arc<PathNode>>);

struct PathNode {
    name:   Ident,
    parent: CallPath,
}

impl CallPath {
    /// Returns this path extended with `name`.
    #[must_use]
    pub fn push(&self, name: Ident) -> Self {
        Self(Some(Arc::new(PathNode { name,
                                      parent: self.clone() })))
    }

    /// Tests whether no function has been entered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the names on the path, outermost first.
    #[must_use]
    pub fn names(&self) -> Vec<Ident> {
        let mut names = Vec::new();
        let mut current = self;
        while let Some(node) = &current.0 {
            names.push(node.name.clone());
            current = &node.parent;
        }
        names.reverse();
        names
    }
}

impl CallPath {
    /// Writes the innermost `limit` names, prefixed by `…` when outer names
    /// were left out.
    pub fn fmt_tail(&self, f: &mut fmt::Formatter<'_>, limit: usize) -> fmt::Result {
        let names = self.names();
        let skipped = names.len().saturating_sub(limit);
        if skipped > 0 {
            f.write_str("…")?;
        }
        for (i, name) in names[skipped..].iter().enumerate() {
            if i > 0 || skipped > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tail(f, usize::MAX)
    }
}

impl fmt::Debug for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallPath({self})")
    }
}

/// A cancellation flag with an optional deadline.
///
/// Clones share the flag, so a host can keep one clone and cancel an
/// evaluation running on another thread.
#[derive(Debug, Clone, Default)]
pub struct Signal {
    cancelled: Arc<AtomicBool>,
    deadline:  Option<Instant>,
}

impl Signal {
    /// Creates a signal that never fires on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this signal with a deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns this signal with a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancels every evaluation sharing this signal.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Tests whether [`Signal::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns the reason evaluation must stop, if any.
    pub fn check(&self) -> Result<(), RuntimeError> {
        if self.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(RuntimeError::DeadlineExceeded);
        }
        Ok(())
    }
}

/// The context threaded through every evaluation step.
///
/// Frames are never changed in place. Each `with_*` method and
/// [`Frame::sub`] returns a modified copy, so concurrent evaluations never
/// observe each other's frames.
#[derive(Debug, Clone)]
pub struct Frame {
    scope:     Scope,
    path:      CallPath,
    signal:    Signal,
    depth:     usize,
    max_depth: usize,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Scope::new())
    }
}

impl Frame {
    /// Creates a top-level frame evaluating in `scope`.
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self { scope,
               path: CallPath::default(),
               signal: Signal::default(),
               depth: 0,
               max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Returns a copy evaluating in `scope`.
    #[must_use]
    pub fn with_scope(&self, scope: Scope) -> Self {
        Self { scope,
               ..self.clone() }
    }

    /// Returns a copy watching `signal`.
    #[must_use]
    pub fn with_signal(&self, signal: Signal) -> Self {
        Self { signal,
               ..self.clone() }
    }

    /// Returns a copy allowing at most `max_depth` nested calls.
    #[must_use]
    pub fn with_max_depth(&self, max_depth: usize) -> Self {
        Self { max_depth,
               ..self.clone() }
    }

    /// Returns the frame for entering the native function `name`.
    ///
    /// Natives show up in the call path but do not count towards the depth
    /// limit, so a builtin wrapping each level of a recursion does not halve
    /// how deep scripts can go.
    #[must_use]
    pub fn enter(&self, name: &Ident) -> Self {
        Self { path: self.path.push(name.clone()),
               ..self.clone() }
    }

    /// Returns the frame for entering the script function `name`.
    #[must_use]
    pub fn sub(&self, name: &Ident) -> Self {
        Self { path: self.path.push(name.clone()),
               depth: self.depth + 1,
               ..self.clone() }
    }

    /// The scope identifiers are resolved in.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The functions entered to reach this frame.
    #[must_use]
    pub const fn path(&self) -> &CallPath {
        &self.path
    }

    /// The cancellation signal.
    #[must_use]
    pub const fn signal(&self) -> &Signal {
        &self.signal
    }

    /// The number of nested script function calls.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Fails if evaluation was cancelled, timed out or nested too deeply.
    pub fn check(&self) -> EvalResult<()> {
        if self.depth > self.max_depth {
            return Err(self.failure(RuntimeError::RecursionLimit { limit: self.max_depth }));
        }
        self.signal.check().map_err(|cause| {
                               debug!(path = %self.path, %cause, "evaluation stopped");
                               self.failure(cause)
                           })
    }

    /// Attributes `cause` to this frame.
    #[must_use]
    pub fn failure(&self, cause: RuntimeError) -> Arc<Failure> {
        Arc::new(Failure { cause,
                           path: self.path.clone() })
    }

    /// Builds an error value attributed to this frame.
    #[must_use]
    pub fn error(&self, cause: RuntimeError) -> Func {
        Func::Error(self.failure(cause))
    }
}
