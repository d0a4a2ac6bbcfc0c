//! Lexical path helpers.
//!
//! Nothing here touches the filesystem.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without consulting the filesystem.
///
/// Returns `None` if a `..` would climb above the first component of `path`
/// (or above the root for absolute paths).
#[must_use]
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }

    Some(out)
}

/// Join a URL path (leading `/` allowed) onto `root`, refusing to escape it.
#[must_use]
pub fn join_url_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = normalize(Path::new(url_path.trim_start_matches('/')))?;
    Some(root.join(relative))
}

/// Render `path` relative to `root` with forward slashes.
///
/// Returns `None` if `path` is not under `root`.
#[must_use]
pub fn to_url_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// `foo/bar` + `.js` → `foo/bar.js`. Unlike `Path::with_extension`, never replaces.
#[must_use]
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(ext);
    PathBuf::from(s)
}

/// Extension of `path` including the leading dot, or an empty string.
#[must_use]
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
