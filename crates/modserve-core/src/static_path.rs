//! Request path to on-disk file mapping.
//!
//! Policy, in order:
//! 1. a path with an extension is used as-is, whether or not it exists
//! 2. `<path><default_extension>` if that is a file
//! 3. `<path>/index.js` if `<path>` is a directory (fixed name, whatever the default extension)
//! 4. otherwise unresolved

use modserve_util::path::{append_extension, dotted_extension, join_url_path, to_url_path};
use std::path::{Path, PathBuf};

/// File served for a directory request.
pub const DIRECTORY_INDEX: &str = "index.js";

/// Outcome of static path resolution.
///
/// `path` is `None` when nothing could be located, which is distinct from
/// resolving to the root itself (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPath {
    /// Path relative to the served root, forward-slash separated, no leading `/`.
    pub path: Option<String>,
    /// Extension of the chosen file including the dot, or empty.
    pub ext: String,
    /// Absolute location of the chosen file.
    pub file: Option<PathBuf>,
}

impl ResolvedPath {
    /// An unresolved result.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Whether a file was chosen.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.path.is_some()
    }
}

/// Maps URL paths under a root directory to files.
#[derive(Debug, Clone)]
pub struct StaticPathResolver {
    root: PathBuf,
    default_extension: String,
}

impl StaticPathResolver {
    #[must_use]
    pub fn new(root: PathBuf, default_extension: impl Into<String>) -> Self {
        Self {
            root,
            default_extension: default_extension.into(),
        }
    }

    /// Served root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extension appended to extensionless candidates.
    #[must_use]
    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    /// Resolve a URL path (query already stripped) relative to the root.
    ///
    /// Paths that would climb out of the root are unresolved.
    #[must_use]
    pub fn resolve(&self, url_path: &str) -> ResolvedPath {
        match join_url_path(&self.root, url_path) {
            Some(candidate) => self.resolve_candidate(&candidate),
            None => ResolvedPath::unresolved(),
        }
    }

    /// Resolve an absolute candidate path.
    #[must_use]
    pub fn resolve_candidate(&self, candidate: &Path) -> ResolvedPath {
        let chosen = if dotted_extension(candidate).is_empty() {
            let with_ext = append_extension(candidate, &self.default_extension);
            if with_ext.is_file() {
                Some(with_ext)
            } else if candidate.is_dir() {
                Some(candidate.join(DIRECTORY_INDEX))
            } else {
                None
            }
        } else {
            Some(candidate.to_path_buf())
        };

        let Some(file) = chosen else {
            return ResolvedPath::unresolved();
        };
        let Some(path) = to_url_path(&self.root, &file) else {
            return ResolvedPath::unresolved();
        };

        ResolvedPath {
            path: Some(path),
            ext: dotted_extension(&file),
            file: Some(file),
        }
    }
}
