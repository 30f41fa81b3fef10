//! Itinerary import/export codec.
//!
//! # Responsibility
//! - Encode itineraries as pretty-printed JSON documents.
//! - Structurally validate arbitrary documents before accepting them.
//! - Enforce file-level constraints (extension, size, emptiness) before decoding.
//!
//! # Invariants
//! - Import is all-or-nothing: any violation yields exactly one error.
//! - `decode(encode(x)) == x` and re-encoding a decoded document is byte-stable.

use crate::validation::ValidationErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod document;
pub mod file;

pub use document::{
    decode_document, decode_stored_value, decode_value, encode_compact, encode_document,
};
pub use file::{
    check_import_file, export_file_name, import_bytes, read_import_file, write_export_file,
    EXPORT_EXTENSION, MAX_IMPORT_BYTES,
};

pub type CodecResult<T> = Result<T, CodecError>;

/// Import/export failure.
///
/// File-constraint variants are reported before any decoding happens.
#[derive(Debug)]
pub enum CodecError {
    /// File name does not end with `.json`.
    UnsupportedExtension(String),
    /// File exceeds the import ceiling.
    FileTooLarge { size: u64, max: u64 },
    /// File has no content (zero bytes or whitespace only).
    EmptyFile,
    /// Document is malformed or violates the itinerary shape.
    Format(String),
    /// Decoded itinerary breaks a business rule.
    Invalid(ValidationErrors),
    Io { path: PathBuf, source: std::io::Error },
}

impl CodecError {
    /// Returns whether this failure came from file constraints rather than content.
    pub fn is_file_constraint(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedExtension(_) | Self::FileTooLarge { .. } | Self::EmptyFile
        )
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedExtension(name) => {
                write!(f, "select a .json file (got `{name}`)")
            }
            Self::FileTooLarge { size, max } => {
                write!(f, "file is too large: {size} bytes (max {max} bytes)")
            }
            Self::EmptyFile => write!(f, "file is empty"),
            Self::Format(message) => write!(f, "invalid itinerary document: {message}"),
            Self::Invalid(errors) => write!(f, "invalid itinerary document: {errors}"),
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
