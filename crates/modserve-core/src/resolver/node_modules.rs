use super::package::DESCRIPTOR_FILE;
use super::specifier::parse_bare_specifier;
use crate::error::ResolveError;
use modserve_util::path::append_extension;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Maps a bare specifier to an installed file.
pub trait DependencyResolver: Send + Sync + std::fmt::Debug {
    /// Absolute path of the file `specifier` loads.
    fn resolve(&self, specifier: &str) -> Result<PathBuf, ResolveError>;
}

/// Nested `node_modules` lookup.
///
/// Checks `<dir>/node_modules/<package>` for the root and every ancestor,
/// then each extra search path (a `node_modules` directory itself, or a
/// directory containing one).
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    root: PathBuf,
    default_extension: String,
    search_paths: Vec<PathBuf>,
}

impl NodeModulesResolver {
    #[must_use]
    pub fn new(root: PathBuf, default_extension: impl Into<String>) -> Self {
        Self {
            root,
            default_extension: default_extension.into(),
            search_paths: Vec::new(),
        }
    }

    /// Add extra roots searched after the ancestor chain.
    #[must_use]
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Candidate `node_modules` directories, nearest first.
    fn node_modules_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .root
            .ancestors()
            .filter(|dir| dir.file_name().map_or(true, |n| n != "node_modules"))
            .map(|dir| dir.join("node_modules"))
            .collect();

        for path in &self.search_paths {
            if path.file_name().is_some_and(|n| n == "node_modules") {
                dirs.push(path.clone());
            } else {
                dirs.push(path.join("node_modules"));
            }
        }

        dirs
    }

    /// Exact file, then with the default extension, then as a directory.
    fn resolve_file(&self, path: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if path.is_file() {
            return Ok(Some(path.to_path_buf()));
        }

        let with_ext = append_extension(path, &self.default_extension);
        if with_ext.is_file() {
            return Ok(Some(with_ext));
        }

        if path.is_dir() {
            return self.resolve_directory(path);
        }

        Ok(None)
    }

    /// Descriptor `main`, then `index<ext>`.
    fn resolve_directory(&self, dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        let index_name = format!("index{}", self.default_extension);
        let descriptor_path = dir.join(DESCRIPTOR_FILE);

        if descriptor_path.is_file() {
            if let Some(main) = read_main(&descriptor_path)? {
                let main_path = dir.join(main);
                trace!(main = %main_path.display(), "trying descriptor main");

                if main_path.is_file() {
                    return Ok(Some(main_path));
                }
                let with_ext = append_extension(&main_path, &self.default_extension);
                if with_ext.is_file() {
                    return Ok(Some(with_ext));
                }
                let main_index = main_path.join(&index_name);
                if main_index.is_file() {
                    return Ok(Some(main_index));
                }
            }
        }

        let index = dir.join(index_name);
        if index.is_file() {
            return Ok(Some(index));
        }

        Ok(None)
    }
}

impl DependencyResolver for NodeModulesResolver {
    fn resolve(&self, specifier: &str) -> Result<PathBuf, ResolveError> {
        let (package_name, subpath) = parse_bare_specifier(specifier)?;

        for node_modules in self.node_modules_dirs() {
            let package_dir = node_modules.join(package_name);
            if !package_dir.is_dir() {
                continue;
            }
            trace!(dir = %package_dir.display(), "package directory found");

            let found = match subpath {
                Some(sub) => self.resolve_file(&package_dir.join(sub))?,
                None => self.resolve_directory(&package_dir)?,
            };
            if let Some(file) = found {
                return Ok(file);
            }
        }

        Err(ResolveError::not_found(specifier))
    }
}

/// Read the `main` field of a descriptor, if it is a non-empty string.
fn read_main(path: &Path) -> Result<Option<String>, ResolveError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| ResolveError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(value
        .get("main")
        .and_then(Value::as_str)
        .filter(|main| !main.is_empty())
        .map(String::from))
}
