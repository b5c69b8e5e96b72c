
use log::info;
use std::fs::File;
use std::path::Path;

use crate::errors::SampleSheetError;

/// Writes sheet content to a new CSV file; rows keep their own lengths.
/// An existing sheet is never replaced, the caller has to remove it first.
/// # Arguments
/// * `content` - the rows of the sheet
/// * `filename` - the destination path
/// # Errors
/// * if something already exists at `filename`
/// * if the file cannot be created or written
pub fn write_sample_sheet(content: &[Vec<String>], filename: &Path) -> Result<(), SampleSheetError> {
    if filename.exists() {
        return Err(SampleSheetError::SampleSheetExists { path: filename.display().to_string() });
    }

    let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(filename)?;
    for row in content.iter() {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    info!("Wrote {} rows to {filename:?}", content.len());
    Ok(())
}

/// Renders sheet content as CSV text, used for dry runs
/// # Errors
/// * if a row cannot be serialized
pub fn sample_sheet_to_string(content: &[Vec<String>]) -> Result<String, SampleSheetError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(vec![]);
    for row in content.iter() {
        csv_writer.write_record(row)?;
    }
    let bytes = csv_writer.into_inner()
        .map_err(|e| SampleSheetError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
