use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a bare specifier into a file.
///
/// None of these reach the client: the specifier resolver's caller downgrades
/// them to the `/node_modules/<specifier>` fallback.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot find module '{specifier}'")]
    NotFound { specifier: String },

    #[error("invalid module specifier '{0}'")]
    InvalidSpecifier(String),

    #[error("invalid package descriptor at {path}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("package '{package}' declares none of the entry fields [{fields}]")]
    NoEntry { package: String, fields: String },

    #[error("{path} is outside the served root")]
    OutsideRoot { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ResolveError {
    pub(crate) fn not_found(specifier: impl Into<String>) -> Self {
        Self::NotFound {
            specifier: specifier.into(),
        }
    }
}

/// Failure while serving a request.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("ENOENT: no such file or directory, open '{path}'")]
    NotFound { path: String },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("request task failed: {0}")]
    Join(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ServeError {
    /// Convert an IO error for `path`, keeping "file not found" distinct.
    #[must_use]
    pub fn from_io(path: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_string(),
            }
        } else {
            Self::Io(err)
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Io(_) | Self::Join(_) | Self::Config(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = ServeError::from_io(
            "missing.html",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_from_io_other() {
        let err = ServeError::from_io(
            "locked.html",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "denied");
    }

    #[test]
    fn test_no_entry_message() {
        let err = ResolveError::NoEntry {
            package: "a".to_string(),
            fields: "module, main".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "package 'a' declares none of the entry fields [module, main]"
        );
    }
}
