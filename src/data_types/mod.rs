
/// Parsed flow cell names and the flow cell context used when building a sheet
pub mod flow_cell;
/// The i5 handling presets and how they are chosen for a run
pub mod index_settings;
/// Instrument generations and run read structure
pub mod run_parameters;
/// Converter and sheet format enumerations
pub mod sample_sheet_format;
/// The validated, in-memory sample sheet
pub mod sample_sheet;
/// LIMS samples, derived attributes, and the per-format sample rows
pub mod samples;
/// Section markers and column names of the sheet file format
pub mod sections;
