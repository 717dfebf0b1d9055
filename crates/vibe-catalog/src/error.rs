#![forbid(unsafe_code)]

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from loading a catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The JSON was malformed or did not match the schema (including an
    /// unknown category name).
    Parse(serde_json::Error),
    /// Two records share an id.
    DuplicateId(String),
    /// A record's `code` is empty after trimming.
    EmptyCode(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read catalog {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid catalog: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate prompt id: {id}"),
            Self::EmptyCode(id) => write!(f, "prompt {id} has an empty body"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::DuplicateId(_) | Self::EmptyCode(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
