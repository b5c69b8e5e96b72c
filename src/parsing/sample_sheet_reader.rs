
use anyhow::Context;
use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxHashSet as HashSet;
use std::path::Path;

use crate::data_types::sample_sheet_format::SampleSheetFormat;
use crate::data_types::samples::FlowCellSample;
use crate::data_types::sections::{BCL2FASTQ_DATA, BCLCONVERT_DATA, DATA_HEADER_TOKENS};
use crate::errors::SampleSheetError;

/// Rows shorter than this are section markers or key-value settings, never data
const MINIMUM_DATA_ROW_LENGTH: usize = 5;

/// A data row keyed by its column name, in column order
pub type RawSample = IndexMap<String, String>;

/// Reads a sample sheet file into rows of cells.
/// Rows may have different lengths, and nothing is treated as a header.
/// # Arguments
/// * `filename` - the CSV sample sheet
/// # Errors
/// * if the file cannot be opened or is not valid CSV
pub fn read_sample_sheet_content(filename: &Path) -> anyhow::Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;

    let mut content = vec![];
    for result in csv_reader.records() {
        let row = result.with_context(|| format!("Error while reading {filename:?}"))?;
        content.push(row.iter().map(|cell| cell.to_string()).collect());
    }
    debug!("Loaded {} rows from {filename:?}", content.len());
    Ok(content)
}

/// Determines the sheet format from its data section marker.
/// The BCLConvert marker takes priority over the legacy one.
/// # Errors
/// * if no row starts with a known data marker
pub fn get_sample_type_from_content(content: &[Vec<String>]) -> Result<SampleSheetFormat, SampleSheetError> {
    let has_marker = |marker: &str| {
        content.iter()
            .any(|row| row.first().map(|cell| cell.as_str()) == Some(marker))
    };

    if has_marker(BCLCONVERT_DATA) {
        Ok(SampleSheetFormat::BclConvert)
    } else if has_marker(BCL2FASTQ_DATA) {
        Ok(SampleSheetFormat::Bcl2Fastq)
    } else {
        Err(SampleSheetError::UnknownSampleType)
    }
}

/// Returns true if a row is exactly the given section marker, ignoring empty trailing cells
pub fn is_section_marker(row: &[String], marker: &str) -> bool {
    match row.split_first() {
        Some((first, rest)) => first == marker && rest.iter().all(|cell| cell.is_empty()),
        None => false
    }
}

/// Looks up the value of a key-value row inside a section, e.g. `Read1Cycles` in `[Reads]`.
/// The section ends at the next row that starts with `[`.
/// # Arguments
/// * `content` - the full sheet content
/// * `section` - the section marker, e.g. "[Reads]"
/// * `key` - the first cell of the wanted row
pub fn get_section_value<'a>(content: &'a [Vec<String>], section: &str, key: &str) -> Option<&'a str> {
    content.iter()
        .skip_while(|row| !is_section_marker(row, section))
        .skip(1)
        .take_while(|row| !row.first().is_some_and(|cell| cell.starts_with('[')))
        .find(|row| row.first().map(|cell| cell.as_str()) == Some(key))
        .and_then(|row| row.get(1))
        .map(|value| value.as_str())
}

/// Pulls the data rows out of the sheet content, each keyed by the most recent column-name row.
/// Short rows are skipped and anything before the first column-name row is ignored.
/// # Errors
/// * if there is no column-name row
/// * if there are no data rows after it
pub fn get_raw_samples_from_content(content: &[Vec<String>]) -> Result<Vec<RawSample>, SampleSheetError> {
    let mut header: Option<&[String]> = None;
    let mut raw_samples = vec![];
    for row in content.iter() {
        if row.len() < MINIMUM_DATA_ROW_LENGTH {
            continue;
        }
        if DATA_HEADER_TOKENS.contains(&row[0].as_str()) {
            // a later header replaces any earlier one
            header = Some(row.as_slice());
            continue;
        }
        if let Some(columns) = header {
            let raw_sample: RawSample = columns.iter().cloned()
                .zip(row.iter().cloned())
                .collect();
            raw_samples.push(raw_sample);
        }
    }

    if header.is_none() {
        return Err(SampleSheetError::MissingHeaderRow);
    }
    if raw_samples.is_empty() {
        return Err(SampleSheetError::NoSamples);
    }
    Ok(raw_samples)
}

/// Converts sheet content into typed sample rows of the detected format
/// # Errors
/// * if the format cannot be detected
/// * if the data rows are missing or do not deserialize
pub fn get_flow_cell_samples_from_content(content: &[Vec<String>]) -> Result<Vec<FlowCellSample>, SampleSheetError> {
    let sample_format = get_sample_type_from_content(content)?;
    get_raw_samples_from_content(content)?
        .iter()
        .map(|raw_sample| {
            let headers: csv::StringRecord = raw_sample.keys().collect();
            let record: csv::StringRecord = raw_sample.values().collect();
            FlowCellSample::from_record(sample_format, &headers, &record)
        })
        .collect()
}

/// Groups samples by lane, keeping the order of first appearance for lanes and samples
pub fn get_samples_by_lane(samples: &[FlowCellSample]) -> IndexMap<u32, Vec<&FlowCellSample>> {
    let mut samples_by_lane: IndexMap<u32, Vec<&FlowCellSample>> = IndexMap::new();
    for sample in samples.iter() {
        samples_by_lane.entry(sample.lane()).or_default().push(sample);
    }
    samples_by_lane
}

/// Checks that no two samples share an id prefix (the part before the first underscore)
/// # Errors
/// * on the first repeated id prefix
pub fn validate_samples_are_unique(samples: &[&FlowCellSample]) -> Result<(), SampleSheetError> {
    let mut seen: HashSet<&str> = Default::default();
    for sample in samples.iter() {
        if !seen.insert(sample.sample_id_prefix()) {
            return Err(SampleSheetError::DuplicateSample { sample_id: sample.sample_id().to_string() });
        }
    }
    Ok(())
}

/// Runs the uniqueness check within every lane
/// # Errors
/// * on the first lane with a repeated id prefix
pub fn validate_samples_unique_per_lane(samples: &[FlowCellSample]) -> Result<(), SampleSheetError> {
    for (lane, lane_samples) in get_samples_by_lane(samples).iter() {
        debug!("Checking sample uniqueness in lane {lane}");
        validate_samples_are_unique(lane_samples)?;
    }
    Ok(())
}
