mod cache;
mod csv_io;

use std::path::Path;

use crate::error::DashboardError;
use crate::models::Table;

pub use cache::TableCache;
pub use csv_io::{read_csv, read_csv_from_bytes};

/// Trait for reading a table from a file.
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<Table, DashboardError>;
}

/// Comma-separated text reader.
pub struct CsvFormat;

impl TableReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Table, DashboardError> {
        read_csv(path)
    }
}

/// Pick a reader for the file's extension. Only `.csv` is accepted.
pub fn reader_for(path: &Path) -> Result<Box<dyn TableReader>, DashboardError> {
    let ext = extension(path);
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        _ => Err(DashboardError::UnsupportedFormat(ext)),
    }
}

/// Load a table from disk after checking the extension.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, DashboardError> {
    let path = path.as_ref();
    reader_for(path)?.read(path)
}

/// Table name for an uploaded file name, rejecting non-CSV uploads.
pub fn upload_name(filename: &str) -> Result<String, DashboardError> {
    let path = Path::new(filename);
    let ext = extension(path);
    if ext != "csv" {
        return Err(DashboardError::UnsupportedFormat(ext));
    }
    Ok(path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
