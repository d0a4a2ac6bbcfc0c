//! `modserve` serve command.

use miette::{IntoDiagnostic, Result};
use modserve_core::version::version_string;
use modserve_core::{parse_entries_order, ServeConfig};
use std::path::PathBuf;
use tracing::info;

/// Serve action, as parsed from the command line.
#[derive(Debug, Clone)]
pub struct ServeAction {
    pub root: PathBuf,
    pub default_extension: String,
    pub entries_order: Vec<String>,
    pub port: u16,
    pub host: String,
    pub search_paths: Vec<PathBuf>,
}

impl ServeAction {
    /// Build the server config. Relative search paths are taken from `root`.
    pub fn to_config(&self) -> ServeConfig {
        let search_paths = self
            .search_paths
            .iter()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    self.root.join(p)
                }
            })
            .collect();

        ServeConfig::new(self.root.clone())
            .with_default_extension(self.default_extension.clone())
            .with_entries_order(parse_entries_order(&self.entries_order.join(",")))
            .with_port(self.port)
            .with_host(self.host.clone())
            .with_search_paths(search_paths)
    }
}

/// Run the server until Ctrl+C.
pub async fn run(action: ServeAction) -> Result<()> {
    info!("{}", version_string());
    modserve_server::run_server(action.to_config())
        .await
        .into_diagnostic()
}
