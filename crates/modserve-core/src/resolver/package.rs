use super::node_modules::DependencyResolver;
use crate::error::ResolveError;
use modserve_util::fs::dir_contains;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// File name of a package descriptor.
pub const DESCRIPTOR_FILE: &str = "package.json";

/// Parsed package descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    /// Declared package name.
    pub name: String,
    /// Every other top-level field.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PackageDescriptor {
    /// Load `<dir>/package.json`.
    pub fn load(dir: &Path) -> Result<Self, ResolveError> {
        let path = dir.join(DESCRIPTOR_FILE);
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|reason| ResolveError::InvalidDescriptor { path, reason })
    }

    /// Parse descriptor JSON. A `name` string is required.
    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Value of `field` if it is a non-empty string.
    #[must_use]
    pub fn entry_field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Pick the entry file: the first field of `order` present in `descriptor`.
///
/// Fails with `NoEntry` rather than assuming a default field.
pub fn select_entry<'a>(
    descriptor: &'a PackageDescriptor,
    order: &[String],
) -> Result<&'a str, ResolveError> {
    order
        .iter()
        .find_map(|field| descriptor.entry_field(field))
        .ok_or_else(|| ResolveError::NoEntry {
            package: descriptor.name.clone(),
            fields: order.join(", "),
        })
}

/// Finds the installation directory of a package.
#[derive(Debug, Clone)]
pub struct PackageLocator {
    root: PathBuf,
    dependencies: Arc<dyn DependencyResolver>,
}

impl PackageLocator {
    #[must_use]
    pub fn new(root: PathBuf, dependencies: Arc<dyn DependencyResolver>) -> Self {
        Self { root, dependencies }
    }

    /// The underlying specifier → file primitive.
    #[must_use]
    pub fn dependencies(&self) -> &Arc<dyn DependencyResolver> {
        &self.dependencies
    }

    /// Directory of the package `package_name` resolves into.
    ///
    /// Walks up from the resolved file's directory to the nearest directory
    /// listing a `package.json`. The served root itself is never a candidate;
    /// for files outside the root the walk continues to the filesystem root.
    pub fn locate(&self, package_name: &str) -> Result<PathBuf, ResolveError> {
        let file = self.dependencies.resolve(package_name)?;
        let start = file.parent().unwrap_or(Path::new("/"));

        for dir in start.ancestors() {
            if dir == self.root.as_path() {
                break;
            }
            if dir_contains(dir, DESCRIPTOR_FILE)? {
                trace!(package = package_name, dir = %dir.display(), "located package");
                return Ok(dir.to_path_buf());
            }
        }

        Err(ResolveError::not_found(package_name))
    }
}
