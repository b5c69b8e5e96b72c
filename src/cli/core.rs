
use anyhow::bail;
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use log::info;
use std::path::Path;

use crate::cli::create::CreateSettings;
use crate::cli::create_all::CreateAllSettings;
use crate::cli::validate::ValidateSettings;
use crate::data_types::flow_cell::FlowCellName;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.3.1-6bb9635-dirty` - while on a dirty branch
    /// * `0.3.1-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2023-{}     demuxsheet developers
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// demuxsheet, builds and checks Illumina sample sheets for demultiplexing.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Checks an existing sample sheet against its flow cell
    Validate(Box<ValidateSettings>),
    /// Builds the sample sheet for a single flow cell
    Create(Box<CreateSettings>),
    /// Builds sample sheets for every flow cell in a batch file, keeping valid existing ones
    CreateAll(Box<CreateAllSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_optional_filename(opt_filename: Option<&Path>, label: &str) -> anyhow::Result<()> {
    if let Some(filename) = opt_filename {
        if !filename.exists() {
            bail!("{} does not exist: \"{}\"", label, filename.display());
        }
    }

    // file either was not specified OR it exists
    Ok(())
}

/// Parses and logs the flow cell name given on the command line
/// # Errors
/// * if the name does not look like an instrument run folder
pub fn check_flow_cell_name(flow_cell_name: &str) -> anyhow::Result<FlowCellName> {
    let parsed: FlowCellName = flow_cell_name.parse()?;
    info!("\tFlow cell: {:?} (instrument {}, run {}, position {})",
        parsed.full_name(), parsed.instrument(), parsed.run_number(), parsed.position());
    Ok(parsed)
}
