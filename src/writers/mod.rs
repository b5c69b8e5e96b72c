/*!
# Writers module
Contains the logic for writing sample sheets and the batch outcome report.
*/
/// Generates the per flow cell outcome table for batch creation
pub mod batch_summary;
/// Writes sample sheet content to CSV
pub mod sample_sheet_writer;
