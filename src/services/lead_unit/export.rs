//! Spreadsheet payloads and saving them to disk.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use thiserror::Error;
use tracing::info;

/// MIME type of `.xlsx` workbooks.
pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Filename for the workbook listing rows rejected by an import.
pub const IMPORT_ERROR_FILENAME: &str = "ImportDonViDauMoiLoi.xlsx";

static DATA_URI_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:[^,;]*(;[^,;]+)*;base64,").unwrap());

/// Errors from decoding or saving a workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}

/// Binary content tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Destination for downloaded files.
pub trait FileSink: Send + Sync {
    /// Persist `blob` under `filename`, returning where it went.
    fn save(&self, blob: &Blob, filename: &str) -> std::io::Result<PathBuf>;
}

/// Writes files into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, blob: &Blob, filename: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(sanitize_filename(filename));
        std::fs::write(&path, &blob.bytes)?;
        info!("Saved {} ({} bytes)", path.display(), blob.bytes.len());
        Ok(path)
    }
}

/// Keep only the final path component so a server-supplied name cannot
/// escape the target directory.
fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        "download".to_string()
    } else {
        name.to_string()
    }
}

/// Decode a Base64 workbook, with or without a `data:` URI prefix.
pub fn decode_spreadsheet(encoded: &str) -> Result<Blob, ExportError> {
    let trimmed = encoded.trim();
    let data = DATA_URI_PREFIX.replace(trimmed, "");
    let bytes = STANDARD.decode(data.as_bytes())?;
    Ok(Blob {
        mime_type: SPREADSHEET_MIME.to_string(),
        bytes,
    })
}

/// Decode the import-error workbook and hand it to `sink`.
pub fn save_error_workbook(sink: &dyn FileSink, encoded: &str) -> Result<PathBuf, ExportError> {
    let blob = decode_spreadsheet(encoded)?;
    Ok(sink.save(&blob, IMPORT_ERROR_FILENAME)?)
}
