/*!
# CLI module
Command line interface functionality for building and checking sample sheets.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The create CLI subcommand
pub mod create;
/// The create-all CLI subcommand
pub mod create_all;
/// The validate CLI subcommand
pub mod validate;
