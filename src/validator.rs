/*!
# Sample sheet validator
Re-reads sheet content and checks it before it is handed to a demultiplexer.
BCLConvert sheets get the full treatment (sections, uniqueness, override cycles against the `[Reads]` section),
while bcl2fastq sheets are only re-parsed and checked for per-lane uniqueness.
Every check fails on the first violation.
*/

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::path::Path;

use crate::data_types::flow_cell::FlowCellName;
use crate::data_types::index_settings::IndexSettings;
use crate::data_types::sample_sheet::SampleSheet;
use crate::data_types::sample_sheet_format::SampleSheetFormat;
use crate::data_types::sections::*;
use crate::errors::SampleSheetError;
use crate::parsing::sample_sheet_reader::{
    get_raw_samples_from_content, get_sample_type_from_content, get_section_value, is_section_marker,
    read_sample_sheet_content, RawSample
};

lazy_static! {
    /// One override cycles token, e.g. "Y151", "I8N2" or "N2I8"
    static ref OVERRIDE_CYCLES_TOKEN: Regex = Regex::new(r"^(?:[YINU][0-9]+)+$").unwrap();
    static ref INDEX_THEN_MASK: Regex = Regex::new(r"^I([0-9]+)N([0-9]+)$").unwrap();
    static ref MASK_THEN_INDEX: Regex = Regex::new(r"^N([0-9]+)I([0-9]+)$").unwrap();
}

/// The cycle counts declared in the `[Reads]` section
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ReadCycles {
    read_1: u32,
    read_2: u32,
    index_1: u32,
    index_2: u32
}

impl ReadCycles {
    fn is_single_index(&self) -> bool {
        self.index_2 == 0
    }
}

/// Validates one sheet's content; the cycle counts and index settings are read lazily by `validate()`
pub struct SampleSheetValidator<'a> {
    /// The rows being checked
    content: &'a [Vec<String>],
    /// The format the content is expected to be
    sample_type: SampleSheetFormat,
    /// Read from `[Reads]`, BCLConvert only
    cycles: Option<ReadCycles>,
    /// Read from `[Header]`; None if the header does not name a preset
    index_settings: Option<IndexSettings>
}

impl<'a> SampleSheetValidator<'a> {
    /// Creates a validator for content of whatever format its data marker declares
    /// # Errors
    /// * if no data marker is present
    pub fn new(content: &'a [Vec<String>]) -> Result<Self, SampleSheetError> {
        let sample_type = get_sample_type_from_content(content)?;
        Ok(Self::for_format(content, sample_type))
    }

    /// Creates a validator that expects a specific format, so a missing data marker is reported as a missing section
    pub fn for_format(content: &'a [Vec<String>], sample_type: SampleSheetFormat) -> Self {
        Self {
            content,
            sample_type,
            cycles: None,
            index_settings: None
        }
    }

    pub fn sample_type(&self) -> SampleSheetFormat {
        self.sample_type
    }

    /// Runs every check for the sheet format and returns the parsed sheet
    /// # Errors
    /// * on the first structural or semantic violation
    pub fn validate(&mut self) -> Result<SampleSheet, SampleSheetError> {
        debug!("Validating {} sample sheet with {} rows", self.sample_type, self.content.len());
        let sample_sheet = match self.sample_type {
            SampleSheetFormat::BclConvert => {
                self.validate_all_sections_present()?;
                self.set_cycles()?;
                self.set_index_settings()?;
                let sample_sheet = self.parse_sample_sheet()?;
                self.validate_override_cycles()?;
                sample_sheet
            },
            SampleSheetFormat::Bcl2Fastq => self.parse_sample_sheet()?
        };
        info!("Sample sheet passed validation with {} samples", sample_sheet.samples().len());
        Ok(sample_sheet)
    }

    fn parse_sample_sheet(&self) -> Result<SampleSheet, SampleSheetError> {
        let sample_sheet = SampleSheet::from_content(self.content)?;
        if sample_sheet.sample_format() != self.sample_type {
            return Err(SampleSheetError::SampleTypeMismatch {
                expected: self.sample_type,
                found: sample_sheet.sample_format()
            });
        }
        Ok(sample_sheet)
    }

    /// Checks that every section marker of the format is present; order is not checked
    /// # Errors
    /// * names the first missing section
    pub fn validate_all_sections_present(&self) -> Result<(), SampleSheetError> {
        let required: &[&'static str] = match self.sample_type {
            SampleSheetFormat::BclConvert => &[HEADER, READS, BCLCONVERT_SETTINGS, BCLCONVERT_DATA],
            SampleSheetFormat::Bcl2Fastq => &[BCL2FASTQ_DATA]
        };
        for &section in required.iter() {
            if !self.content.iter().any(|row| is_section_marker(row, section)) {
                return Err(SampleSheetError::MissingSection { section });
            }
        }
        Ok(())
    }

    /// Checks that the `RunName` header entry belongs to the given flow cell.
    /// bcl2fastq sheets carry no header and always pass.
    /// # Errors
    /// * if a BCLConvert sheet has no run name, or a different one
    pub fn validate_run_name(&self, flow_cell_name: &FlowCellName) -> Result<(), SampleSheetError> {
        if self.sample_type == SampleSheetFormat::Bcl2Fastq {
            debug!("No run name to check in a {} sheet", self.sample_type);
            return Ok(());
        }
        let run_name = get_section_value(self.content, HEADER, RUN_NAME)
            .ok_or(SampleSheetError::MissingSectionEntry { section: HEADER, name: RUN_NAME })?;
        if run_name != flow_cell_name.full_name() {
            return Err(SampleSheetError::FlowCellMismatch {
                expected: flow_cell_name.full_name().to_string(),
                found: run_name.to_string()
            });
        }
        Ok(())
    }

    fn set_cycles(&mut self) -> Result<(), SampleSheetError> {
        let cycles = ReadCycles {
            read_1: self.get_cycles(READ_1_CYCLES)?.unwrap_or_default(),
            read_2: self.get_cycles(READ_2_CYCLES)?.unwrap_or_default(),
            index_1: self.get_cycles(INDEX_1_CYCLES)?.unwrap_or_default(),
            // single-index sheets leave this out
            index_2: self.get_cycles(INDEX_2_CYCLES)?.unwrap_or(0)
        };
        for (name, value) in [(READ_1_CYCLES, cycles.read_1), (READ_2_CYCLES, cycles.read_2), (INDEX_1_CYCLES, cycles.index_1)] {
            if value == 0 {
                return Err(SampleSheetError::MissingSectionEntry { section: READS, name });
            }
        }
        debug!("Sample sheet cycles: {cycles:?}");
        self.cycles = Some(cycles);
        Ok(())
    }

    fn get_cycles(&self, name: &'static str) -> Result<Option<u32>, SampleSheetError> {
        get_section_value(self.content, READS, name)
            .map(|value| {
                value.trim().parse::<u32>()
                    .map_err(|_e| SampleSheetError::InvalidNumber { field: name, value: value.to_string() })
            })
            .transpose()
    }

    fn set_index_settings(&mut self) -> Result<(), SampleSheetError> {
        self.index_settings = match get_section_value(self.content, HEADER, INDEX_SETTINGS) {
            Some(name) => Some(
                IndexSettings::from_name(name)
                    .ok_or_else(|| SampleSheetError::UnknownIndexSettings { name: name.to_string() })?
            ),
            None => None
        };
        Ok(())
    }

    /// Checks that every override cycles string is well formed and agrees with the `[Reads]` section.
    /// Each `;`-separated token must be one or more `<Y|I|N|U><cycles>` groups, with 4 tokens for dual-index runs and 3 otherwise.
    /// # Errors
    /// * if cycles have not been read yet, or on the first malformed or mismatched sample
    pub fn validate_override_cycles(&mut self) -> Result<(), SampleSheetError> {
        if self.cycles.is_none() {
            self.set_cycles()?;
        }
        let expected_tokens = match self.cycles {
            Some(cycles) if cycles.is_single_index() => 3,
            _ => 4
        };

        for raw_sample in get_raw_samples_from_content(self.content)?.iter() {
            let (sample_id, override_cycles) = sample_override_cycles(raw_sample);
            let tokens: Vec<&str> = override_cycles.split(';').collect();
            if tokens.len() != expected_tokens || !tokens.iter().all(|token| OVERRIDE_CYCLES_TOKEN.is_match(token)) {
                return Err(SampleSheetError::MalformedOverrideCycles {
                    sample_id: sample_id.to_string(),
                    override_cycles: override_cycles.to_string()
                });
            }
            self.validate_read_and_index_cycles(raw_sample)?;
        }
        Ok(())
    }

    /// Checks one sample's override cycles against the declared read and index cycles.
    /// Reads must match exactly; an index term may be masked as `I<a>N<b>` as long as `a + b` covers the index read.
    /// For index 2 the `N<b>I<a>` form is also allowed when the header preset reads the i5 reverse complemented.
    /// # Arguments
    /// * `sample` - one raw data row
    /// # Errors
    /// * if the cycles were never read from the sheet
    /// * on any term that does not fit the run
    pub fn validate_read_and_index_cycles(&self, sample: &RawSample) -> Result<(), SampleSheetError> {
        let cycles = self.cycles
            .ok_or(SampleSheetError::MissingSectionEntry { section: READS, name: READ_1_CYCLES })?;
        let (sample_id, override_cycles) = sample_override_cycles(sample);
        let mismatch = |reason: String| SampleSheetError::CyclesMismatch {
            sample_id: sample_id.to_string(),
            override_cycles: override_cycles.to_string(),
            reason
        };

        let tokens: Vec<&str> = override_cycles.split(';').collect();
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return Err(mismatch("no terms".to_string()));
        };
        if *first != format!("Y{}", cycles.read_1) {
            return Err(mismatch(format!("read 1 term should be Y{}", cycles.read_1)));
        }
        if *last != format!("Y{}", cycles.read_2) {
            return Err(mismatch(format!("read 2 term should be Y{}", cycles.read_2)));
        }

        let index_1 = tokens.get(1).copied().unwrap_or_default();
        if !is_index_1_term_valid(index_1, cycles.index_1) {
            return Err(mismatch(format!("index 1 term {index_1:?} does not cover {} cycles", cycles.index_1)));
        }

        if !cycles.is_single_index() {
            let index_2 = tokens.get(2).copied().unwrap_or_default();
            let orientation = self.index_settings.map(|settings| settings.are_i5_override_cycles_reverse_complemented());
            if !is_index_2_term_valid(index_2, cycles.index_2, orientation) {
                return Err(mismatch(format!("index 2 term {index_2:?} does not cover {} cycles", cycles.index_2)));
            }
        }
        Ok(())
    }
}

fn sample_override_cycles(sample: &RawSample) -> (&str, &str) {
    let sample_id = sample.get(BCLCONVERT_SAMPLE_ID).map(|s| s.as_str()).unwrap_or_default();
    let override_cycles = sample.get(OVERRIDE_CYCLES).map(|s| s.as_str()).unwrap_or_default();
    (sample_id, override_cycles)
}

/// Sums the two numeric groups of a masked term if the regex matches
fn masked_total(regex: &Regex, term: &str) -> Option<u64> {
    let captures = regex.captures(term)?;
    let a: u64 = captures.get(1)?.as_str().parse().ok()?;
    let b: u64 = captures.get(2)?.as_str().parse().ok()?;
    Some(a + b)
}

fn is_index_1_term_valid(term: &str, index_cycles: u32) -> bool {
    term == format!("I{index_cycles}") ||
        masked_total(&INDEX_THEN_MASK, term) == Some(index_cycles as u64)
}

/// `reverse_complemented` is None when the sheet names no preset, in which case both mask orders are accepted
fn is_index_2_term_valid(term: &str, index_cycles: u32, reverse_complemented: Option<bool>) -> bool {
    if term == format!("I{index_cycles}") || term == format!("N{index_cycles}") {
        return true;
    }
    let forward = masked_total(&INDEX_THEN_MASK, term) == Some(index_cycles as u64);
    let reverse = masked_total(&MASK_THEN_INDEX, term) == Some(index_cycles as u64);
    match reverse_complemented {
        Some(true) => reverse,
        Some(false) => forward,
        None => forward || reverse
    }
}

/// Validates sheet content of whichever format it declares and returns the parsed sheet
/// # Errors
/// * on the first violation
pub fn validate_sample_sheet_from_content(content: &[Vec<String>]) -> Result<SampleSheet, SampleSheetError> {
    SampleSheetValidator::new(content)?.validate()
}

/// Reads and validates a sample sheet file
/// # Arguments
/// * `filename` - the CSV sample sheet
/// # Errors
/// * if the file cannot be read
/// * on the first violation
pub fn validate_sample_sheet_from_file(filename: &Path) -> anyhow::Result<SampleSheet> {
    info!("Validating sample sheet {filename:?}");
    let content = read_sample_sheet_content(filename)?;
    Ok(validate_sample_sheet_from_content(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn to_content(rows: &[&str]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.split(',').map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn bcl_convert_content(index_settings: &str, index_2_cycles: u32, override_cycles: &str) -> Vec<Vec<String>> {
        let index_2_row = format!("Index2Cycles,{index_2_cycles}");
        let index_settings_row = format!("IndexSettings,{index_settings}");
        let sample_row = format!("1,ACC1,GAACTGAGCG,CGCTCCAC,{override_cycles},,,1,1");
        let mut rows = vec![
            "[Header]", "FileFormatVersion,2", "RunName,230912_A00187_1009_AHK33MDRXY", "InstrumentPlatform,NovaSeq6000",
            "IndexOrientation,Forward", index_settings_row.as_str(),
            "[Reads]", "Read1Cycles,151", "Read2Cycles,151", "Index1Cycles,10",
        ];
        if index_2_cycles > 0 {
            rows.push(index_2_row.as_str());
        }
        rows.extend([
            "[BCLConvert_Settings]", "SoftwareVersion,4.1.7", "FastqCompressionFormat,gzip",
            "[BCLConvert_Data]",
            "Lane,Sample_ID,Index,Index2,OverrideCycles,AdapterRead1,AdapterRead2,BarcodeMismatchesIndex1,BarcodeMismatchesIndex2",
            sample_row.as_str(),
        ]);
        to_content(&rows)
    }

    #[test]
    fn test_valid_files() {
        let sample_sheet = validate_sample_sheet_from_file(&PathBuf::from("test_data/sample_sheets/valid_bcl_convert.csv")).unwrap();
        assert_eq!(sample_sheet.sample_format(), SampleSheetFormat::BclConvert);
        assert_eq!(sample_sheet.samples().len(), 4);

        let sample_sheet = validate_sample_sheet_from_file(&PathBuf::from("test_data/sample_sheets/valid_bcl2fastq.csv")).unwrap();
        assert_eq!(sample_sheet.sample_format(), SampleSheetFormat::Bcl2Fastq);
    }

    #[test]
    fn test_missing_data_marker() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/missing_data_marker.csv")).unwrap();
        let validator = SampleSheetValidator::for_format(&content, SampleSheetFormat::BclConvert);
        assert!(matches!(
            validator.validate_all_sections_present(),
            Err(SampleSheetError::MissingSection { section: BCLCONVERT_DATA })
        ));
        // without an expected format there is nothing to detect
        assert!(matches!(SampleSheetValidator::new(&content), Err(SampleSheetError::UnknownSampleType)));
    }

    #[test]
    fn test_wrong_read_cycles() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/wrong_read_cycles.csv")).unwrap();
        let result = validate_sample_sheet_from_content(&content);
        match result {
            Err(SampleSheetError::CyclesMismatch { sample_id, override_cycles, .. }) => {
                assert_eq!(sample_id, "ACC7628A2");
                assert_eq!(override_cycles, "Y101;I10;I10;Y101");
            },
            other => panic!("unexpected result: {other:?}")
        }
    }

    #[test]
    fn test_duplicate_in_lane() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/duplicate_in_lane.csv")).unwrap();
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::DuplicateSample { .. })
        ));
    }

    #[test]
    fn test_sample_type_mismatch() {
        let content = read_sample_sheet_content(&PathBuf::from("test_data/sample_sheets/valid_bcl_convert.csv")).unwrap();
        let mut validator = SampleSheetValidator::for_format(&content, SampleSheetFormat::Bcl2Fastq);
        assert!(matches!(
            validator.validate(),
            Err(SampleSheetError::SampleTypeMismatch { expected: SampleSheetFormat::Bcl2Fastq, found: SampleSheetFormat::BclConvert })
        ));
    }

    #[test]
    fn test_override_cycles_structure() {
        // a realistic string passes the token check
        let content = bcl_convert_content("NovaSeq6000Post1.5Kits", 10, "Y151;I10;I8N2;Y151");
        assert!(validate_sample_sheet_from_content(&content).is_ok());

        // dual-index runs need four terms
        let content = bcl_convert_content("NovaSeq6000Post1.5Kits", 10, "Y151;I10;Y151");
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::MalformedOverrideCycles { .. })
        ));

        let content = bcl_convert_content("NovaSeq6000Post1.5Kits", 10, "Y151;X10;I10;Y151");
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::MalformedOverrideCycles { .. })
        ));

        // single-index runs need three
        let content = bcl_convert_content("NovaSeqX", 0, "Y151;I10;Y151");
        assert!(validate_sample_sheet_from_content(&content).is_ok());
    }

    #[test]
    fn test_index_terms() {
        // masked index 1 must add up to the index cycles
        let content = bcl_convert_content("NovaSeqX", 10, "Y151;I8N1;I10;Y151");
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::CyclesMismatch { .. })
        ));

        // the i5 mask order follows the preset
        let content = bcl_convert_content("NovaSeqX", 10, "Y151;I10;N2I8;Y151");
        assert!(validate_sample_sheet_from_content(&content).is_ok());
        let content = bcl_convert_content("NovaSeq6000Post1.5Kits", 10, "Y151;I10;N2I8;Y151");
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::CyclesMismatch { .. })
        ));

        // fully masked i5
        let content = bcl_convert_content("NoReverseComplements", 10, "Y151;I10;N10;Y151");
        assert!(validate_sample_sheet_from_content(&content).is_ok());

        let content = bcl_convert_content("SomethingElse", 10, "Y151;I10;I10;Y151");
        assert!(matches!(
            validate_sample_sheet_from_content(&content),
            Err(SampleSheetError::UnknownIndexSettings { .. })
        ));
    }

    #[test]
    fn test_validate_read_and_index_cycles_directly() {
        let content = bcl_convert_content("NovaSeqX", 10, "Y151;I10;I10;Y151");
        let mut validator = SampleSheetValidator::new(&content).unwrap();
        let raw_samples = get_raw_samples_from_content(&content).unwrap();

        // cycles are needed first
        assert!(validator.validate_read_and_index_cycles(&raw_samples[0]).is_err());
        validator.validate_override_cycles().unwrap();
        assert!(validator.validate_read_and_index_cycles(&raw_samples[0]).is_ok());
    }

    #[test]
    fn test_validate_run_name() {
        let content = bcl_convert_content("NovaSeqX", 10, "Y151;I10;I10;Y151");
        let validator = SampleSheetValidator::new(&content).unwrap();
        let name: FlowCellName = "230912_A00187_1009_AHK33MDRXY".parse().unwrap();
        assert!(validator.validate_run_name(&name).is_ok());

        let other: FlowCellName = "230912_A00187_1010_BHK33MDRXY".parse().unwrap();
        assert!(matches!(
            validator.validate_run_name(&other),
            Err(SampleSheetError::FlowCellMismatch { .. })
        ));
    }
}
