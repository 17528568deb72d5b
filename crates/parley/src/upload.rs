//! Helpers for turning files on disk into uploads.

use std::path::Path;

use parley_core::DocumentFormat;

/// The media type declared for files whose extension is not recognized.
///
/// The core rejects it like any other unsupported type.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Returns the media type to declare for the file at `path`, based on its
/// extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
        .map(|format| format.media_type())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}
