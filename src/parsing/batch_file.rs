
use anyhow::{ensure, Context};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data_types::flow_cell::FlowCellName;
use crate::data_types::sample_sheet_format::BclConverter;

/// One flow cell of a batch, as written in the file
#[derive(Debug, Deserialize)]
struct BatchRecord {
    flow_cell_name: String,
    run_parameters: PathBuf,
    lims_samples: PathBuf,
    sample_sheet: PathBuf,
    #[serde(default)]
    bcl_converter: Option<BclConverter>
}

/// A fully resolved batch entry
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchEntry {
    /// The flow cell the sheet is for
    flow_cell_name: FlowCellName,
    /// Run parameters JSON
    run_parameters: PathBuf,
    /// LIMS samples JSON
    lims_samples: PathBuf,
    /// Where the sheet goes
    sample_sheet: PathBuf,
    /// Converter for this flow cell, the batch default if None
    bcl_converter: Option<BclConverter>
}

impl BatchEntry {
    /// Constructor
    pub fn new(
        flow_cell_name: FlowCellName, run_parameters: PathBuf, lims_samples: PathBuf, sample_sheet: PathBuf,
        bcl_converter: Option<BclConverter>
    ) -> Self {
        Self { flow_cell_name, run_parameters, lims_samples, sample_sheet, bcl_converter }
    }

    pub fn flow_cell_name(&self) -> &FlowCellName {
        &self.flow_cell_name
    }

    pub fn run_parameters(&self) -> &Path {
        &self.run_parameters
    }

    pub fn lims_samples(&self) -> &Path {
        &self.lims_samples
    }

    pub fn sample_sheet(&self) -> &Path {
        &self.sample_sheet
    }

    pub fn bcl_converter(&self) -> Option<BclConverter> {
        self.bcl_converter
    }
}

/// Loads a tab-delimited batch file with the columns `flow_cell_name`, `run_parameters`, `lims_samples`, `sample_sheet`,
/// and an optional `bcl_converter`. Relative paths are resolved against the folder holding the batch file.
/// # Arguments
/// * `filename` - the batch file
/// # Errors
/// * if the file cannot be read or a row does not deserialize
/// * if a flow cell name is invalid or repeated
pub fn load_batch_file(filename: &Path) -> anyhow::Result<Vec<BatchEntry>> {
    let base_folder: PathBuf = filename.parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .from_path(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;

    let mut entries: Vec<BatchEntry> = vec![];
    for result in csv_reader.deserialize() {
        let record: BatchRecord = result
            .with_context(|| format!("Error while deserializing {filename:?}:"))?;
        let flow_cell_name: FlowCellName = record.flow_cell_name.parse()?;
        ensure!(
            !entries.iter().any(|e| e.flow_cell_name == flow_cell_name),
            "Flow cell {flow_cell_name} is listed more than once in {filename:?}"
        );
        entries.push(BatchEntry {
            flow_cell_name,
            run_parameters: base_folder.join(record.run_parameters),
            lims_samples: base_folder.join(record.lims_samples),
            sample_sheet: base_folder.join(record.sample_sheet),
            bcl_converter: record.bcl_converter
        });
    }
    debug!("Loaded {} batch entries from {filename:?}", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_batch_file() {
        let entries = load_batch_file(&PathBuf::from("test_data/batch/batch.tsv")).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.flow_cell_name().full_name(), "230912_A00187_1009_AHK33MDRXY");
        assert_eq!(first.run_parameters(), Path::new("test_data/batch/novaseq_6000_run_parameters.json"));
        assert_eq!(first.lims_samples(), Path::new("test_data/batch/lims_samples.json"));
        assert_eq!(first.sample_sheet(), Path::new("test_data/batch/out/SampleSheet_AHK33MDRXY.csv"));
        assert_eq!(first.bcl_converter(), None);

        assert_eq!(entries[1].bcl_converter(), Some(BclConverter::Bcl2fastq));
    }
}
