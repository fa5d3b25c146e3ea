//! Error types for reading datasets, configuring and running the miner.

use std::io;
use std::path::{Path, PathBuf};

use serde_yaml;
use thiserror::Error;

use sequence::ParseError;

/// Result type alias for mining runs.
pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A dataset line could not be turned into a sequence.
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// Reading the dataset or writing rules/logs failed.
    #[error("cannot {action} `{}`: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The minimum utility is not a finite number.
    #[error("invalid minimum utility `{0}`")]
    InvalidThreshold(String),

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Builds a mapper from `io::Error` that remembers what was being done to
    /// which file.
    pub fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Error + 'a {
        move |source| Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}
