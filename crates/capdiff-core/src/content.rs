//! Content loader for capture artifacts
//!
//! An artifact is either raw command text or, when it was produced by a
//! parsing capture mode, a JSON document. The loader tries both forms and
//! returns a tagged result; it never panics and never hands back a silent
//! empty value for a file it could not understand.

use std::fs;
use std::path::Path;

/// Extension that marks an artifact as stored in structured form
pub const STRUCTURED_EXTENSION: &str = "json";

/// One loaded artifact
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedContent {
    /// Line-oriented text, each line keeping its terminator
    Text(Vec<String>),
    /// Structured document
    Structured(serde_json::Value),
    /// Neither form could be decoded; carries the reason
    Unreadable(String),
}

impl LoadedContent {
    pub fn is_readable(&self) -> bool {
        !matches!(self, LoadedContent::Unreadable(_))
    }

    /// Lines to feed the diff report writer
    ///
    /// Structured documents are pretty-printed with sorted keys so that two
    /// documents differing only in key order render identically.
    /// `Unreadable` yields no lines.
    pub fn lines(&self) -> Vec<String> {
        match self {
            LoadedContent::Text(lines) => lines.clone(),
            LoadedContent::Structured(value) => {
                let mut pretty = serde_json::to_string_pretty(value).unwrap_or_default();
                pretty.push('\n');
                split_lines(&pretty)
            }
            LoadedContent::Unreadable(_) => Vec::new(),
        }
    }
}

/// Load an artifact from disk
///
/// A `.json` file is attempted as a structured document first, everything
/// else as text first; each falls back to the other form.
pub fn load(path: &Path) -> LoadedContent {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return LoadedContent::Unreadable(format!("read failed: {}", e)),
    };
    let structured_first = path
        .extension()
        .map(|ext| ext == STRUCTURED_EXTENSION)
        .unwrap_or(false);
    load_bytes(&bytes, structured_first)
}

/// Decode already-read artifact bytes
pub fn load_bytes(bytes: &[u8], structured_first: bool) -> LoadedContent {
    if structured_first {
        match parse_structured(bytes) {
            Ok(value) => LoadedContent::Structured(value),
            Err(structured_err) => match decode_text(bytes) {
                Ok(lines) => LoadedContent::Text(lines),
                Err(text_err) => LoadedContent::Unreadable(format!(
                    "not a structured document ({}) and not text ({})",
                    structured_err, text_err
                )),
            },
        }
    } else {
        match decode_text(bytes) {
            Ok(lines) => LoadedContent::Text(lines),
            Err(text_err) => match parse_structured(bytes) {
                Ok(value) => LoadedContent::Structured(value),
                Err(structured_err) => LoadedContent::Unreadable(format!(
                    "not text ({}) and not a structured document ({})",
                    text_err, structured_err
                )),
            },
        }
    }
}

fn decode_text(bytes: &[u8]) -> Result<Vec<String>, std::str::Utf8Error> {
    std::str::from_utf8(bytes).map(split_lines)
}

fn parse_structured(bytes: &[u8]) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}
