#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use modserve_core::config::{DEFAULT_ENTRIES_ORDER, DEFAULT_EXTENSION};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modserve")]
#[command(author, version, about = "Serve a directory, rewriting bare module imports to node_modules paths", long_about = None)]
struct Cli {
    /// Extension tried for extensionless paths
    #[arg(short = 'e', long, env = "MODSERVE_DEFAULT_EXTENSION", default_value = DEFAULT_EXTENSION)]
    default_extension: String,

    /// Comma-separated package.json fields tried, in order, for a package's entry file
    #[arg(short = 'o', long, env = "MODSERVE_ENTRIES_ORDER", default_value = DEFAULT_ENTRIES_ORDER, value_delimiter = ',')]
    entries_order: Vec<String>,

    /// Port to listen on
    #[arg(short, long, env = "MODSERVE_PORT", default_value_t = 8080)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory to serve (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Extra directory searched for installed packages (repeatable)
    #[arg(long = "search-path", value_name = "PATH")]
    search_paths: Vec<PathBuf>,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON formatted logs
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = cli
        .root
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    logging::init(cli.verbose, cli.json);

    let action = commands::serve::ServeAction {
        root,
        default_extension: cli.default_extension,
        entries_order: cli.entries_order,
        port: cli.port,
        host: cli.host,
        search_paths: cli.search_paths,
    };

    let rt = tokio::runtime::Runtime::new().into_diagnostic()?;
    rt.block_on(commands::serve::run(action))
}
