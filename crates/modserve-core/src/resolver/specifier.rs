use super::node_modules::DependencyResolver;
use super::package::{select_entry, PackageDescriptor, PackageLocator};
use crate::config::ServeConfig;
use crate::error::ResolveError;
use crate::static_path::{ResolvedPath, StaticPathResolver};
use modserve_util::path::{normalize, to_url_path};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Turns a bare specifier into a server path (relative to the root, no leading `/`).
///
/// Implementations never fail; see [`ModuleSpecifierResolver::resolve_or_fallback`].
pub trait SpecifierResolver: Send + Sync {
    fn server_path(&self, specifier: &str) -> String;
}

impl<F> SpecifierResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn server_path(&self, specifier: &str) -> String {
        self(specifier)
    }
}

/// Split a bare specifier into package name and sub-path.
///
/// `lodash/fp` → (`lodash`, `fp`), `@scope/pkg/sub/x` → (`@scope/pkg`, `sub/x`).
pub fn parse_bare_specifier(spec: &str) -> Result<(&str, Option<&str>), ResolveError> {
    if spec.is_empty() || spec.starts_with('.') || spec.starts_with('/') {
        return Err(ResolveError::InvalidSpecifier(spec.to_string()));
    }

    let mut slashes = spec.match_indices('/').map(|(i, _)| i);
    // `@scope` alone is not a package name.
    if spec.starts_with('@') && slashes.next().is_none() {
        return Err(ResolveError::InvalidSpecifier(spec.to_string()));
    }
    let split = slashes.next();

    Ok(match split {
        Some(i) => {
            let sub = &spec[i + 1..];
            (&spec[..i], (!sub.is_empty()).then_some(sub))
        }
        None => (spec, None),
    })
}

/// Resolves bare specifiers through the package's descriptor entry.
#[derive(Debug, Clone)]
pub struct ModuleSpecifierResolver {
    static_paths: StaticPathResolver,
    locator: PackageLocator,
    entries_order: Vec<String>,
}

impl ModuleSpecifierResolver {
    #[must_use]
    pub fn new(
        static_paths: StaticPathResolver,
        locator: PackageLocator,
        entries_order: Vec<String>,
    ) -> Self {
        Self {
            static_paths,
            locator,
            entries_order,
        }
    }

    /// Wire up the default `node_modules` lookup from a config.
    #[must_use]
    pub fn from_config(config: &ServeConfig) -> Self {
        let dependencies: Arc<dyn DependencyResolver> = Arc::new(
            super::NodeModulesResolver::new(config.root.clone(), &config.default_extension)
                .with_search_paths(config.search_paths.clone()),
        );
        Self::new(
            StaticPathResolver::new(config.root.clone(), &config.default_extension),
            PackageLocator::new(config.root.clone(), dependencies),
            config.entries_order.clone(),
        )
    }

    /// Resolve `specifier` to a file under its package directory.
    ///
    /// A specifier equal to the package's declared name targets the entry
    /// file itself; anything else targets its sub-path, relative to the entry
    /// file's directory.
    pub fn resolve_specifier(&self, specifier: &str) -> Result<ResolvedPath, ResolveError> {
        let (package_name, subpath) = parse_bare_specifier(specifier)?;
        let package_dir = self.locator.locate(package_name)?;
        let descriptor = PackageDescriptor::load(&package_dir)?;
        let entry = Path::new(select_entry(&descriptor, &self.entries_order)?);

        let target = if specifier == descriptor.name {
            entry
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            subpath.unwrap_or_default().to_string()
        };

        let mut candidate = package_dir.join(entry.parent().unwrap_or(Path::new("")));
        if !target.is_empty() {
            candidate.push(&target);
        }
        let candidate =
            normalize(&candidate).ok_or(ResolveError::OutsideRoot { path: candidate })?;

        debug!(specifier, candidate = %candidate.display(), "composed module candidate");
        Ok(self.static_paths.resolve_candidate(&candidate))
    }

    /// Resolve `specifier`, never failing.
    ///
    /// - resolved: the composed file
    /// - composed path unresolved: the file the dependency lookup found
    /// - any error: `node_modules/<specifier>`
    #[must_use]
    pub fn resolve_or_fallback(&self, specifier: &str) -> String {
        let result = self.resolve_specifier(specifier).and_then(|resolved| {
            match resolved.path {
                Some(path) => Ok(path),
                None => self.dependency_path(specifier),
            }
        });

        match result {
            Ok(path) => path,
            Err(e) => {
                debug!(specifier, error = %e, "module resolution failed, using fallback");
                format!("node_modules/{specifier}")
            }
        }
    }

    fn dependency_path(&self, specifier: &str) -> Result<String, ResolveError> {
        let file = self.locator.dependencies().resolve(specifier)?;
        to_url_path(self.static_paths.root(), &file).ok_or(ResolveError::OutsideRoot { path: file })
    }
}

impl SpecifierResolver for ModuleSpecifierResolver {
    fn server_path(&self, specifier: &str) -> String {
        self.resolve_or_fallback(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Layout mirroring a small site with two installed packages.
    fn fixture() -> TempDir {
        let dir = tempdir().unwrap();
        let a = dir.path().join("node_modules/a");
        fs::create_dir_all(a.join("dir")).unwrap();
        fs::write(a.join("package.json"), r#"{"name": "a", "main": "file.js"}"#).unwrap();
        fs::write(a.join("file.js"), "// file.js").unwrap();
        fs::write(a.join("dir/index.js"), "// index.js").unwrap();

        let scoped = dir.path().join("node_modules/@scope/pkg");
        fs::create_dir_all(scoped.join("dist/lib")).unwrap();
        fs::write(
            scoped.join("package.json"),
            r#"{"name": "@scope/pkg", "module": "./dist/index.mjs", "main": "dist/index.js"}"#,
        )
        .unwrap();
        fs::write(scoped.join("dist/index.mjs"), "").unwrap();
        fs::write(scoped.join("dist/index.js"), "").unwrap();
        fs::write(scoped.join("dist/lib/util.js"), "").unwrap();
        dir
    }

    fn resolver(root: &Path) -> ModuleSpecifierResolver {
        ModuleSpecifierResolver::from_config(&ServeConfig::new(root.to_path_buf()))
    }

    #[test]
    fn test_parse_bare_specifier() {
        assert_eq!(parse_bare_specifier("lodash").unwrap(), ("lodash", None));
        assert_eq!(
            parse_bare_specifier("lodash/fp/map").unwrap(),
            ("lodash", Some("fp/map"))
        );
        assert_eq!(
            parse_bare_specifier("@scope/pkg").unwrap(),
            ("@scope/pkg", None)
        );
        assert_eq!(
            parse_bare_specifier("@scope/pkg/lib/util").unwrap(),
            ("@scope/pkg", Some("lib/util"))
        );
    }

    #[test]
    fn test_parse_bare_specifier_invalid() {
        assert!(parse_bare_specifier("").is_err());
        assert!(parse_bare_specifier("./local").is_err());
        assert!(parse_bare_specifier("/abs").is_err());
        assert!(parse_bare_specifier("@scope").is_err());
    }

    #[test]
    fn test_package_name_targets_entry_basename() {
        let dir = fixture();
        let result = resolver(dir.path()).resolve_specifier("a").unwrap();

        assert_eq!(result.path.as_deref(), Some("node_modules/a/file.js"));
        assert_eq!(result.ext, ".js");
    }

    #[test]
    fn test_subpath_directory() {
        let dir = fixture();
        let result = resolver(dir.path()).resolve_specifier("a/dir").unwrap();
        assert_eq!(result.path.as_deref(), Some("node_modules/a/dir/index.js"));
    }

    #[test]
    fn test_entries_order_precedence() {
        let dir = fixture();
        let result = resolver(dir.path()).resolve_specifier("@scope/pkg").unwrap();
        assert_eq!(
            result.path.as_deref(),
            Some("node_modules/@scope/pkg/dist/index.mjs")
        );
    }

    #[test]
    fn test_scoped_subpath_uses_entry_directory() {
        let dir = fixture();
        let result = resolver(dir.path())
            .resolve_specifier("@scope/pkg/lib/util")
            .unwrap();
        assert_eq!(
            result.path.as_deref(),
            Some("node_modules/@scope/pkg/dist/lib/util.js")
        );
    }

    #[test]
    fn test_fallback_when_missing() {
        let dir = fixture();
        assert_eq!(
            resolver(dir.path()).resolve_or_fallback("not-installed-xyz"),
            "node_modules/not-installed-xyz"
        );
    }

    #[test]
    fn test_fallback_on_no_entry() {
        let dir = fixture();
        let config = ServeConfig::new(dir.path().to_path_buf())
            .with_entries_order(vec!["browser".to_string()]);
        let resolver = ModuleSpecifierResolver::from_config(&config);

        assert!(matches!(
            resolver.resolve_specifier("a"),
            Err(ResolveError::NoEntry { .. })
        ));
        assert_eq!(resolver.resolve_or_fallback("a"), "node_modules/a");
    }

    #[test]
    fn test_unresolved_candidate_uses_dependency_file() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/c");
        fs::create_dir_all(pkg.join("src")).unwrap();
        // `module` points into a directory the static policy cannot resolve.
        fs::write(
            pkg.join("package.json"),
            r#"{"name": "c", "module": "build/c", "main": "src/c.js"}"#,
        )
        .unwrap();
        fs::write(pkg.join("src/c.js"), "").unwrap();

        let resolver = resolver(dir.path());
        let resolved = resolver.resolve_specifier("c").unwrap();
        assert!(!resolved.is_resolved());
        assert_eq!(resolver.resolve_or_fallback("c"), "node_modules/c/src/c.js");
    }

    #[test]
    fn test_closure_resolver() {
        let stub = |spec: &str| format!("vendor/{spec}.js");
        assert_eq!(stub.server_path("a"), "vendor/a.js");
    }
}
