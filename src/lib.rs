
/// Get-or-create helpers shared by the single and batch creation commands
pub mod batch;
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Error types shared across the sample sheet modules
pub mod errors;
/// Index sequence math: reverse complements, Hamming distances, override cycles
pub mod index_math;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Builds sample sheet content from LIMS samples and run parameters
pub mod sample_sheet_creator;
/// Various utility functions that tend to be very generic
pub mod util;
/// Structural and semantic checks of sample sheet content
pub mod validator;
/// All output writers
pub mod writers;
