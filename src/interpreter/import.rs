use std::sync::Arc;

use indexmap::IndexMap;

use crate::{error::ImportError, interpreter::value::module::Module};

/// Resolves import paths to modules.
///
/// The translator calls [`Importer::import`] once for every import
/// declaration it meets. Closures taking the path implement the trait, so a
/// host can resolve imports however it likes.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use wdte::{
///     error::ImportError,
///     interpreter::{import::Importer, value::module::Module},
/// };
///
/// let importer = |path: &str| -> Result<Arc<Module>, ImportError> {
///     match path {
///         "empty" => Ok(Arc::new(Module::new())),
///         _ => Err(ImportError::Unknown { path: path.into() }),
///     }
/// };
///
/// assert!(importer.import("empty").is_ok());
/// assert!(importer.import("other").is_err());
/// ```
pub trait Importer {
    /// Returns the module known under `path`.
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError>;
}

impl<F> Importer for F where F: Fn(&str) -> Result<Arc<Module>, ImportError>
{
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        self(path)
    }
}

/// An explicit table of modules a host makes importable by name.
///
/// An empty registry rejects every import, which suits scripts that must not
/// import anything.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: IndexMap<String, Arc<Module>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `module` importable as `path`, returning the module it replaces.
    pub fn register(&mut self, path: impl Into<String>, module: Arc<Module>) -> Option<Arc<Module>> {
        self.modules.insert(path.into(), module)
    }

    /// Builder form of [`Registry::register`].
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, module: Arc<Module>) -> Self {
        self.register(path, module);
        self
    }

    /// Returns the module registered as `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Arc<Module>> {
        self.modules.get(path)
    }
}

impl Importer for Registry {
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        self.get(path)
            .cloned()
            .ok_or_else(|| ImportError::Unknown { path: path.to_string() })
    }
}
