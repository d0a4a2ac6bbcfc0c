#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! HTTP surface for modserve.
//!
//! ```text
//! GET /node_modules/a/file
//!   → static path policy (extension, default extension, directory index)
//!   → read
//!   → rewrite bare imports (scripts only)
//!   → 200 with Content-Type / Content-Length
//! ```

pub mod server;
pub mod state;

pub use server::{router, run_server, serve};
pub use state::{ServeState, Served};
