use crate::error::ServeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default extension probed for extensionless request paths.
pub const DEFAULT_EXTENSION: &str = ".js";

/// Default descriptor fields consulted for a package's entry file, in order.
pub const DEFAULT_ENTRIES_ORDER: &str = "es2015,module,main";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Directory whose contents are served.
    pub root: PathBuf,

    /// Extension appended to extensionless paths (with leading dot).
    pub default_extension: String,

    /// Package descriptor fields tried left to right when picking an entry file.
    pub entries_order: Vec<String>,

    /// Port to listen on.
    pub port: u16,

    /// Address to bind to.
    pub host: String,

    /// Extra roots searched for installed packages after the ancestor
    /// `node_modules` directories of `root`.
    pub search_paths: Vec<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            default_extension: DEFAULT_EXTENSION.to_string(),
            entries_order: parse_entries_order(DEFAULT_ENTRIES_ORDER),
            port: DEFAULT_PORT,
            host: "127.0.0.1".to_string(),
            search_paths: Vec::new(),
        }
    }
}

impl ServeConfig {
    /// Create a new config serving the given directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Set the default extension.
    #[must_use]
    pub fn with_default_extension(mut self, ext: impl Into<String>) -> Self {
        self.default_extension = ext.into();
        self
    }

    /// Set the entry field preference list.
    #[must_use]
    pub fn with_entries_order(mut self, order: Vec<String>) -> Self {
        self.entries_order = order;
        self
    }

    /// Set the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the extra package search paths.
    #[must_use]
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Check invariants and normalize fields.
    ///
    /// The entry preference list must be non-empty, and the default extension
    /// always carries its leading dot afterwards.
    pub fn validate(mut self) -> Result<Self, ServeError> {
        self.entries_order.retain(|field| !field.trim().is_empty());
        if self.entries_order.is_empty() {
            return Err(ServeError::Config(
                "entries order must name at least one field".to_string(),
            ));
        }

        let ext = self.default_extension.trim();
        if ext.is_empty() || ext == "." {
            return Err(ServeError::Config(
                "default extension must not be empty".to_string(),
            ));
        }
        self.default_extension = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };

        Ok(self)
    }
}

/// Split a comma-separated field list, dropping blanks.
#[must_use]
pub fn parse_entries_order(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect()
}
