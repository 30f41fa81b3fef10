//! File-level import constraints and export naming.

use crate::codec::document::{decode_document, encode_document};
use crate::codec::{CodecError, CodecResult};
use crate::model::itinerary::Itinerary;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Extension required for import and used for export files.
pub const EXPORT_EXTENSION: &str = "json";
/// Import ceiling: 10 MiB.
pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

/// Returns `<title>_<YYYYMMDD>.json` for an export made on `export_date`.
///
/// Path separators and control characters in the title become `_`.
pub fn export_file_name(title: &str, export_date: NaiveDate) -> String {
    let safe_title = title
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect::<String>();
    format!(
        "{safe_title}_{}.{EXPORT_EXTENSION}",
        export_date.format("%Y%m%d")
    )
}

/// Checks name and size constraints before any content is read.
pub fn check_import_file(file_name: &str, size: u64) -> CodecResult<()> {
    let has_json_extension = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == EXPORT_EXTENSION);
    if !has_json_extension {
        return Err(CodecError::UnsupportedExtension(file_name.to_string()));
    }
    if size > MAX_IMPORT_BYTES {
        return Err(CodecError::FileTooLarge {
            size,
            max: MAX_IMPORT_BYTES,
        });
    }
    if size == 0 {
        return Err(CodecError::EmptyFile);
    }
    Ok(())
}

/// Imports an itinerary from in-memory file contents (for example an upload).
pub fn import_bytes(file_name: &str, bytes: &[u8]) -> CodecResult<Itinerary> {
    check_import_file(file_name, bytes.len() as u64)?;
    let text = std::str::from_utf8(bytes)
        .map_err(|_| CodecError::Format("file is not valid UTF-8 text".to_string()))?;
    decode_text(text)
}

/// Imports an itinerary from a file on disk.
pub fn read_import_file(path: &Path) -> CodecResult<Itinerary> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = std::fs::metadata(path).map_err(|source| io_error(path, source))?;
    check_import_file(&file_name, metadata.len())?;

    let bytes = std::fs::read(path).map_err(|source| io_error(path, source))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| CodecError::Format("file is not valid UTF-8 text".to_string()))?;
    let result = decode_text(&text);
    match &result {
        Ok(_) => info!(
            "event=itinerary_import module=codec status=ok bytes={}",
            metadata.len()
        ),
        Err(err) => warn!(
            "event=itinerary_import module=codec status=rejected file_constraint={}",
            err.is_file_constraint()
        ),
    }
    result
}

/// Writes the export document into `dir` and returns the created path.
pub fn write_export_file(
    itinerary: &Itinerary,
    dir: &Path,
    export_date: NaiveDate,
) -> CodecResult<PathBuf> {
    let contents = encode_document(itinerary)?;
    let path = dir.join(export_file_name(&itinerary.title, export_date));
    std::fs::write(&path, contents.as_bytes()).map_err(|source| io_error(&path, source))?;
    info!(
        "event=itinerary_export module=codec status=ok bytes={}",
        contents.len()
    );
    Ok(path)
}

fn decode_text(text: &str) -> CodecResult<Itinerary> {
    if text.trim().is_empty() {
        return Err(CodecError::EmptyFile);
    }
    decode_document(text)
}

fn io_error(path: &Path, source: std::io::Error) -> CodecError {
    CodecError::Io {
        path: path.to_path_buf(),
        source,
    }
}
