//! Error types for link state persistence.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while recording link state.
///
/// Reads never surface these: a state file that cannot be read is treated as
/// holding no values.
#[derive(Debug, Error)]
pub enum StateError {
    /// The state directory could not be created
    #[error("cannot create state directory '{path}': {source}")]
    CreateDir {
        /// Directory that failed to be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value could not be appended to a state file
    #[error("cannot append to state file '{path}': {source}")]
    Append {
        /// File that failed to be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Value contains a line break and would corrupt the line-oriented file
    #[error("state value must be a single line: {value:?}")]
    MultiLineValue {
        /// The rejected value
        value: String,
    },
}

impl StateError {
    /// Creates a `CreateDir` error.
    #[must_use]
    pub fn create_dir(path: &Path, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an `Append` error.
    #[must_use]
    pub fn append(path: &Path, source: std::io::Error) -> Self {
        Self::Append {
            path: path.to_path_buf(),
            source,
        }
    }
}
