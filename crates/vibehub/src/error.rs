#![forbid(unsafe_code)]

use std::fmt;
use std::io;
use std::path::PathBuf;

use vibe_catalog::CatalogError;

/// Fatal startup and runtime errors. Everything else degrades in place.
#[derive(Debug)]
pub enum AppError {
    /// Terminal setup or output failed.
    Io(io::Error),
    /// The prompt catalog could not be loaded.
    Catalog(CatalogError),
    /// The log file could not be opened or a subscriber was already set.
    Logging { path: PathBuf, reason: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal error: {err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Logging { path, reason } => {
                write!(f, "cannot log to {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Logging { .. } => None,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_errors_keep_their_source() {
        let err = AppError::from(io::Error::other("tty gone"));
        assert_eq!(err.to_string(), "terminal error: tty gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn catalog_errors_display_verbatim() {
        let err = AppError::from(CatalogError::DuplicateId("x".into()));
        assert_eq!(err.to_string(), "duplicate prompt id: x");
    }
}
