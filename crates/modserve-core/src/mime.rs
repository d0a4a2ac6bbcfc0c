//! Extension → `Content-Type` table.

/// Content type for unknown extensions.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Look up the content type for an extension (with or without the leading dot).
#[must_use]
pub fn content_type(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "js" | "mjs" | "cjs" | "jsx" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Content type for a resolved extension, using the default extension when empty.
#[must_use]
pub fn content_type_or_default(ext: &str, default_extension: &str) -> &'static str {
    if ext.is_empty() {
        content_type(default_extension)
    } else {
        content_type(ext)
    }
}
