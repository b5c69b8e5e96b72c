/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Parser for the batch file that drives creation for many flow cells
pub mod batch_file;
/// Catalogue of named index sequences, loaded from CSV
pub mod index_repository;
/// Reads sample sheet files and pulls sections and samples out of their content
pub mod sample_sheet_reader;
