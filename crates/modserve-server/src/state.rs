//! Per-request pipeline over immutable shared state.

use modserve_core::mime::content_type_or_default;
use modserve_core::rewrite::is_script_extension;
use modserve_core::{
    ImportRewriter, ModuleSpecifierResolver, ServeConfig, ServeError, SourceRewriter,
    StaticPathResolver,
};
use modserve_util::fs::read_to_string_lossy;
use tracing::debug;

/// A response body ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

/// Read-only state shared by every request.
pub struct ServeState {
    config: ServeConfig,
    static_paths: StaticPathResolver,
    rewriter: Box<dyn SourceRewriter>,
}

impl std::fmt::Debug for ServeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeState")
            .field("config", &self.config)
            .field("static_paths", &self.static_paths)
            .finish_non_exhaustive()
    }
}

impl ServeState {
    /// Validate `config`, canonicalize its root and build the default pipeline.
    pub fn new(config: ServeConfig) -> Result<Self, ServeError> {
        let mut config = config.validate()?;
        config.root = dunce::canonicalize(&config.root)?;

        let rewriter = ImportRewriter::new(ModuleSpecifierResolver::from_config(&config));
        Ok(Self::with_rewriter(config, Box::new(rewriter)))
    }

    /// Build with a custom source rewriter. `config` is used as given.
    #[must_use]
    pub fn with_rewriter(config: ServeConfig, rewriter: Box<dyn SourceRewriter>) -> Self {
        let static_paths =
            StaticPathResolver::new(config.root.clone(), config.default_extension.clone());
        Self {
            config,
            static_paths,
            rewriter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    /// Produce the body for a request path (query string already removed).
    ///
    /// Blocking: call from a blocking-capable thread.
    pub fn load(&self, url_path: &str) -> Result<Served, ServeError> {
        let url_path = if url_path.is_empty() || url_path == "/" {
            "index.html"
        } else {
            url_path
        };

        let resolved = self.static_paths.resolve(url_path);
        let (Some(path), Some(file)) = (resolved.path, resolved.file) else {
            return Err(ServeError::NotFound {
                path: url_path.trim_start_matches('/').to_string(),
            });
        };

        let default_extension = &self.config.default_extension;

        let body = if is_script_extension(&resolved.ext, default_extension) {
            let source = read_to_string_lossy(&file).map_err(|e| ServeError::from_io(&path, e))?;
            let rewritten = self.rewriter.rewrite(&source);
            debug!(path = %path, changed = rewritten != source.as_str(), "rewrote imports");
            rewritten.into_owned().into_bytes()
        } else {
            std::fs::read(&file).map_err(|e| ServeError::from_io(&path, e))?
        };

        Ok(Served {
            body,
            content_type: content_type_or_default(&resolved.ext, default_extension),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::fs;
    use tempfile::tempdir;

    struct Uppercase;

    impl SourceRewriter for Uppercase {
        fn rewrite<'a>(&self, source: &'a str) -> Cow<'a, str> {
            Cow::Owned(source.to_uppercase())
        }
    }

    #[test]
    fn test_root_serves_index_html() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<title>Index HTML</title>").unwrap();

        let state = ServeState::new(ServeConfig::new(dir.path().to_path_buf())).unwrap();
        let served = state.load("/").unwrap();
        assert_eq!(served.content_type, "text/html");
        assert_eq!(served.body, b"<title>Index HTML</title>");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let state = ServeState::new(ServeConfig::new(dir.path().to_path_buf())).unwrap();

        let err = state.load("/nonexistent.html").unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("nonexistent.html"));

        let err = state.load("/no/extension").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_escape_is_not_found() {
        let dir = tempdir().unwrap();
        let state = ServeState::new(ServeConfig::new(dir.path().to_path_buf())).unwrap();
        assert_eq!(state.load("/../secret.txt").unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_only_scripts_are_rewritten() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "import x from 'y';").unwrap();
        fs::write(dir.path().join("a.txt"), "import x from 'y';").unwrap();

        let config = ServeConfig::new(dir.path().to_path_buf());
        let state = ServeState::with_rewriter(config, Box::new(Uppercase));

        assert_eq!(state.load("/a").unwrap().body, b"IMPORT X FROM 'Y';");
        let txt = state.load("/a.txt").unwrap();
        assert_eq!(txt.body, b"import x from 'y';");
        assert_eq!(txt.content_type, "text/plain");
    }

    #[test]
    fn test_invalid_utf8_script_read_lossily() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.js"), b"import 'a';\xff\n").unwrap();
        fs::write(dir.path().join("blob.bin"), b"\xff\xfe").unwrap();

        let state = ServeState::new(ServeConfig::new(dir.path().to_path_buf())).unwrap();
        let body = String::from_utf8(state.load("/bad.js").unwrap().body).unwrap();
        assert!(body.contains('\u{FFFD}'), "body: {body}");
        assert_eq!(state.load("/blob.bin").unwrap().body, b"\xff\xfe");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let config = ServeConfig::new(dir.path().to_path_buf()).with_entries_order(Vec::new());
        assert!(ServeState::new(config).is_err());
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = tempdir().unwrap();
        let config = ServeConfig::new(dir.path().join("missing"));
        assert!(ServeState::new(config).is_err());
    }
}
