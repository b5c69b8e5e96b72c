/// Helper functions for read/writing JSON via serde, including the run parameters and LIMS inputs
pub mod json_io;
/// Helper functions for generating the progress bars
pub mod progress_bar;
