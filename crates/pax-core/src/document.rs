//! Loading HTML documents from disk
//!
//! Author: hephaex@gmail.com

use std::path::Path;

use crate::{PaxError, Result};

/// Read an HTML document as text.
///
/// Pages saved by browsers are not always valid UTF-8; invalid byte runs are
/// replaced with U+FFFD instead of failing the whole read.
pub fn read_html(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| PaxError::Document {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
