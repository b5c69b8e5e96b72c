use crate::data_types::run_parameters::Sequencer;
use crate::data_types::sample_sheet_format::{BclConverter, SampleSheetFormat};
use crate::index_math::IndexMathError;

/// Everything that can go wrong while building, reading, or validating a sample sheet.
/// Variants are grouped by kind; callers that loop over many flow cells catch these and move on.
#[derive(thiserror::Error, Debug)]
pub enum SampleSheetError {
    // configuration errors
    #[error("cannot build a {sheet_format} sample sheet for a flow cell demultiplexed with {bcl_converter}")]
    IncompatibleConverter { sheet_format: SampleSheetFormat, bcl_converter: BclConverter },

    // input data errors
    #[error("no LIMS samples were provided for flow cell {flow_cell}")]
    NoLimsSamples { flow_cell: String },
    #[error("a sample sheet already exists at {path}")]
    SampleSheetExists { path: String },
    #[error("{sheet_format} sample sheets are not supported for {sequencer}, supported sequencers: {supported}")]
    UnsupportedSequencer { sheet_format: SampleSheetFormat, sequencer: Sequencer, supported: String },
    #[error("invalid flow cell name: {name:?}")]
    InvalidFlowCellName { name: String },
    #[error("invalid version string: {version:?}")]
    InvalidVersion { version: String },
    #[error("sample sheet run name {found:?} does not match flow cell {expected:?}")]
    FlowCellMismatch { expected: String, found: String },
    #[error("expected a {expected} sample sheet, found {found}")]
    SampleTypeMismatch { expected: SampleSheetFormat, found: SampleSheetFormat },

    // structural errors
    #[error("could not determine the sample sheet type, no data section marker found")]
    UnknownSampleType,
    #[error("could not find a header row in the sample sheet")]
    MissingHeaderRow,
    #[error("sample sheet does not contain any samples")]
    NoSamples,
    #[error("sample sheet is missing the {section} section")]
    MissingSection { section: &'static str },
    #[error("sample sheet is missing the {name} entry in the {section} section")]
    MissingSectionEntry { section: &'static str, name: &'static str },

    // semantic errors
    #[error("sample {sample_id} is present more than once in the same lane")]
    DuplicateSample { sample_id: String },
    #[error("lane must be >= 1, found {lane} for sample {sample_id}")]
    InvalidLane { sample_id: String, lane: u32 },
    #[error("sample id must not be empty (lane {lane})")]
    EmptySampleId { lane: u32 },
    #[error("could not parse {field} value {value:?} as a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("malformed override cycles {override_cycles:?} for sample {sample_id}")]
    MalformedOverrideCycles { sample_id: String, override_cycles: String },
    #[error("override cycles {override_cycles:?} for sample {sample_id} do not match the run cycles: {reason}")]
    CyclesMismatch { sample_id: String, override_cycles: String, reason: String },
    #[error("unknown index settings {name:?} in sample sheet header")]
    UnknownIndexSettings { name: String },
    #[error("error in index math: {0}")]
    IndexMath(#[from] IndexMathError),

    // wrapped errors
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
