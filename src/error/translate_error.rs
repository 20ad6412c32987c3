use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by an import resolver.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No module is known under the requested path.
    #[error("unknown module '{path}'")]
    Unknown {
        /// The requested import path.
        path: String,
    },
    /// The module source could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        /// The file that was being read.
        path:   PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
    /// The module source was read but could not be loaded.
    #[error("failed to load '{path}': {source}")]
    Load {
        /// The requested import path.
        path:   String,
        /// Why loading failed.
        source: Box<super::Error>,
    },
    /// The module is already being loaded further up the import chain.
    #[error("import cycle through '{path}'")]
    Cycle {
        /// The import path that closed the cycle.
        path: String,
    },
}

/// Errors that stop translation of a parse tree.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The import resolver rejected an import declaration.
    #[error("import '{path}' failed: {source}")]
    Import {
        /// The import path as written in the source.
        path:   String,
        /// The resolver's error.
        #[source]
        source: ImportError,
    },
    /// The tree does not have the shape the parser produces.
    #[error("malformed parse tree at <{nterm}>")]
    Malformed {
        /// The non-terminal whose children were unexpected.
        nterm: &'static str,
    },
}
