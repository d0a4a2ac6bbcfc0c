#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Core engine for modserve.
//!
//! Maps request paths to files on disk and rewrites bare module specifiers
//! in served scripts to concrete `/node_modules/...` URLs.

pub mod config;
pub mod error;
pub mod mime;
pub mod resolver;
pub mod rewrite;
pub mod static_path;
pub mod version;

pub use config::{parse_entries_order, ServeConfig};
pub use error::{ResolveError, ServeError};
pub use resolver::{
    parse_bare_specifier, select_entry, DependencyResolver, ModuleSpecifierResolver,
    NodeModulesResolver, PackageDescriptor, PackageLocator, SpecifierResolver,
};
pub use rewrite::{ImportRewriter, SourceRewriter};
pub use static_path::{ResolvedPath, StaticPathResolver};
pub use version::VERSION;
