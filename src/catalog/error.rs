//! Error types for catalog loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading a catalog file.
///
/// These never abort a load: the registry logs them and continues with the
/// remaining catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be opened
    #[error("cannot open catalog '{path}': {source}")]
    Open {
        /// Catalog path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Catalog header row could not be read
    #[error("cannot read header of catalog '{path}': {source}")]
    Header {
        /// Catalog path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Catalog directory could not be listed
    #[error("cannot list catalog directory '{path}': {source}")]
    ListDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Creates an `Open` error.
    #[must_use]
    pub fn open(path: &Path, source: std::io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a `Header` error.
    #[must_use]
    pub fn header(path: &Path, source: csv::Error) -> Self {
        Self::Header {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a `ListDir` error.
    #[must_use]
    pub fn list_dir(path: &Path, source: std::io::Error) -> Self {
        Self::ListDir {
            path: path.to_path_buf(),
            source,
        }
    }
}
