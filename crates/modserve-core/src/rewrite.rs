//! Import rewriting for served scripts.
//!
//! Rewrites top-level static imports of bare specifiers to absolute URL paths:
//! - `import x from 'react';` → `import x from '/node_modules/react/index.js';`
//! - `import "./local.js";` and `import "/abs.js";` are left alone
//!
//! Works on text, one line-anchored regex pass. Imports that do not start a
//! line (inside blocks, after other code) are not rewritten.

use crate::resolver::SpecifierResolver;
use regex_lite::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Rewrites a served source file before it is sent.
pub trait SourceRewriter: Send + Sync {
    fn rewrite<'a>(&self, source: &'a str) -> Cow<'a, str>;
}

/// `import <clause>? <quote><bare specifier><quote>;?` at the start of a line.
///
/// Each quote style gets its own alternative so mismatched quotes never match.
const IMPORT_PATTERN: &str =
    r#"(?m)^import (.*? from )?(?:"([^/."\n][^"\n]*)"|'([^/.'\n][^'\n]*)');?"#;

fn import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IMPORT_PATTERN).expect("import pattern should compile"))
}

/// Line-anchored regex import rewriter.
pub struct ImportRewriter<R> {
    resolver: R,
}

impl<R: SpecifierResolver> ImportRewriter<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Resolver used for each matched specifier.
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn replace(&self, caps: &Captures<'_>) -> String {
        let clause = caps.get(1).map_or("", |m| m.as_str());
        let (quote, specifier) = match (caps.get(2), caps.get(3)) {
            (Some(m), _) => ('"', m.as_str()),
            (None, Some(m)) => ('\'', m.as_str()),
            // One of the alternatives always participates.
            (None, None) => return caps[0].to_string(),
        };

        let path = self.resolver.server_path(specifier);
        format!("import {clause}{quote}/{path}{quote};")
    }
}

impl<R: SpecifierResolver> SourceRewriter for ImportRewriter<R> {
    fn rewrite<'a>(&self, source: &'a str) -> Cow<'a, str> {
        import_regex().replace_all(source, |caps: &Captures<'_>| self.replace(caps))
    }
}

/// Whether files with this extension go through the rewriter.
#[must_use]
pub fn is_script_extension(ext: &str, default_extension: &str) -> bool {
    ext == ".js" || ext == ".mjs" || (!ext.is_empty() && ext == default_extension)
}
