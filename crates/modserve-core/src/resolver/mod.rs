//! Bare module specifier resolution.
//!
//! - `node_modules`: maps a specifier to an installed file (nested lookup)
//! - `package`: finds a package's directory and reads its descriptor
//! - `specifier`: composes both with the static path policy into a URL path

mod node_modules;
mod package;
mod specifier;

pub use node_modules::{DependencyResolver, NodeModulesResolver};
pub use package::{select_entry, PackageDescriptor, PackageLocator, DESCRIPTOR_FILE};
pub use specifier::{parse_bare_specifier, ModuleSpecifierResolver, SpecifierResolver};
