
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use strum_macros::Display;

/// What happened to one flow cell of a batch
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatchStatus {
    /// A valid sheet was already in place
    Existing,
    /// A new sheet was written
    Created,
    /// The sheet was built but not written
    DryRun,
    /// Something went wrong, see the error column
    Failed
}

/// One row of the batch summary file
#[derive(Clone, Debug, Serialize)]
pub struct BatchSummaryRow {
    /// Full flow cell name
    flow_cell: String,
    /// Outcome for this flow cell
    status: BatchStatus,
    /// Number of samples written to the sheet
    samples: usize,
    /// Number of LIMS samples left out of the sheet
    dropped_samples: usize,
    /// The error message on failure, empty otherwise
    error: String
}

impl BatchSummaryRow {
    /// Row for a flow cell that has a usable sheet
    pub fn success(flow_cell: String, status: BatchStatus, samples: usize, dropped_samples: usize) -> Self {
        Self {
            flow_cell,
            status,
            samples,
            dropped_samples,
            error: String::new()
        }
    }

    /// Row for a flow cell that failed
    pub fn failure(flow_cell: String, error: String) -> Self {
        Self {
            flow_cell,
            status: BatchStatus::Failed,
            samples: 0,
            dropped_samples: 0,
            error
        }
    }

    pub fn flow_cell(&self) -> &str {
        &self.flow_cell
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }
}

/// Writes the batch outcome table
/// # Arguments
/// * `rows` - one row per flow cell
/// * `filename` - the output path; ".csv" gets commas, anything else tabs
/// # Errors
/// * if the file cannot be created or written
pub fn write_batch_summary(rows: &[BatchSummaryRow], filename: &Path) -> csv::Result<()> {
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)?;
    for row in rows.iter() {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_batch_summary() {
        let rows = vec![
            BatchSummaryRow::success("230912_A00187_1009_AHK33MDRXY".to_string(), BatchStatus::Created, 4, 1),
            BatchSummaryRow::failure("230912_A00187_1010_BHK33MDRXY".to_string(), "no LIMS samples".to_string()),
        ];
        let path = std::env::temp_dir().join(format!("demuxsheet_{}_batch_summary.tsv", std::process::id()));
        write_batch_summary(&rows, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "flow_cell\tstatus\tsamples\tdropped_samples\terror",
            "230912_A00187_1009_AHK33MDRXY\tcreated\t4\t1\t",
            "230912_A00187_1010_BHK33MDRXY\tfailed\t0\t0\tno LIMS samples",
        ]);
        std::fs::remove_file(&path).unwrap();
    }
}
