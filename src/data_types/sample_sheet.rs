
use indexmap::IndexMap;

use crate::data_types::sample_sheet_format::SampleSheetFormat;
use crate::data_types::samples::FlowCellSample;
use crate::errors::SampleSheetError;
use crate::parsing::sample_sheet_reader::{
    get_flow_cell_samples_from_content, get_sample_type_from_content, get_samples_by_lane,
    validate_samples_unique_per_lane
};

/// A parsed sample sheet whose lanes are known to hold unique samples
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleSheet {
    /// Format detected from the data marker
    sample_format: SampleSheetFormat,
    /// Samples in sheet order
    samples: Vec<FlowCellSample>
}

impl SampleSheet {
    /// Parses sheet content and checks per-lane sample uniqueness
    /// # Errors
    /// * if the content has no recognisable data section or rows
    /// * if any row fails to deserialize
    /// * if a lane contains the same sample twice
    pub fn from_content(content: &[Vec<String>]) -> Result<Self, SampleSheetError> {
        let sample_format = get_sample_type_from_content(content)?;
        let samples = get_flow_cell_samples_from_content(content)?;
        validate_samples_unique_per_lane(&samples)?;
        Ok(Self {
            sample_format,
            samples
        })
    }

    pub fn sample_format(&self) -> SampleSheetFormat {
        self.sample_format
    }

    pub fn samples(&self) -> &[FlowCellSample] {
        &self.samples
    }

    /// Samples grouped per lane, in order of appearance
    pub fn samples_by_lane(&self) -> IndexMap<u32, Vec<&FlowCellSample>> {
        get_samples_by_lane(&self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sample_sheet_reader::read_sample_sheet_content;
    use std::path::PathBuf;

    #[test]
    fn test_bcl2fastq_sheet() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/valid_bcl2fastq.csv")).unwrap();
        let sample_sheet = SampleSheet::from_content(&content).unwrap();
        assert_eq!(sample_sheet.sample_format(), SampleSheetFormat::Bcl2Fastq);
        assert_eq!(sample_sheet.samples().len(), 3);
        assert_eq!(sample_sheet.samples_by_lane().len(), 2);
        match &sample_sheet.samples()[0] {
            FlowCellSample::Bcl2Fastq(sample) => {
                assert_eq!(sample.flowcell_id, "HHKVCALXX");
                assert_eq!(sample.project, "504910");
            },
            FlowCellSample::BclConvert(_) => panic!("wrong format")
        }
    }

    #[test]
    fn test_duplicate_sheet() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/duplicate_in_lane.csv")).unwrap();
        assert!(matches!(
            SampleSheet::from_content(&content),
            Err(SampleSheetError::DuplicateSample { .. })
        ));
    }
}
