//! Error types for the cpe2csv crate.

use std::path::PathBuf;

/// Errors that can occur while fetching or converting the CPE dictionary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither `--update` nor `--input` was given.
    #[error(
        "you need to specify either --update to fetch the latest dictionary \
         or --input to convert a local XML file"
    )]
    NoInput,

    /// The supplied input file does not exist.
    #[error("the specified XML file '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create or write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to delete a temporary artifact.
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Network error during dictionary download.
    #[cfg(feature = "download")]
    #[error("download failed: {0}")]
    Download(String),

    /// The downloaded archive is not a readable zip, or lacks the dictionary.
    #[error("failed to extract archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Low-level XML syntax error.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Structurally invalid dictionary document.
    #[error("invalid dictionary: {0}")]
    Parse(String),

    /// Failed to serialize a CSV row.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
