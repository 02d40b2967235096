//! Selection of where the dictionary comes from.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The single input mode chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Download the current dictionary from NVD.
    Fetch,
    /// Convert an existing XML file.
    LocalPath(PathBuf),
}

impl InputSource {
    /// Resolve the `--update` / `--input` flags into one source.
    ///
    /// `update` wins over `input`, in which case the path is not checked.
    /// Otherwise the path must exist.
    pub fn resolve(update: bool, input: Option<&Path>) -> Result<Self> {
        if update {
            return Ok(Self::Fetch);
        }
        match input {
            Some(path) if path.exists() => Ok(Self::LocalPath(path.to_path_buf())),
            Some(path) => Err(Error::InputNotFound {
                path: path.to_path_buf(),
            }),
            None => Err(Error::NoInput),
        }
    }

    /// Whether this run produces temporary files that need cleanup.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch)
    }
}
