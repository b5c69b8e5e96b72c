
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::sample_sheet_format::BclConverter;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct CreateAllSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    demuxsheet_version: String,

    /// Batch file with one flow cell per row (TSV)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "batch")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub batch_filename: PathBuf,

    /// Optional index catalogue to translate index ids into sequences (CSV)
    #[clap(long = "index-catalogue")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub index_catalogue: Option<PathBuf>,

    /// Optional outcome table with one row per flow cell (TSV/CSV)
    #[clap(long = "summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub summary_filename: Option<PathBuf>,

    /// Demultiplexing software for rows that do not name one
    #[clap(short = 'b')]
    #[clap(long = "bcl-converter")]
    #[clap(value_name = "CONVERTER")]
    #[clap(help_heading = Some("Sample sheet"))]
    #[clap(default_value = "bclconvert")]
    pub bcl_converter: BclConverter,

    /// Builds the sheets without writing them
    #[clap(long = "dry-run")]
    #[clap(help_heading = Some("Sample sheet"))]
    pub dry_run: bool,

    /// Skips validation of the built sheets
    #[clap(long = "force")]
    #[clap(help_heading = Some("Sample sheet"))]
    pub force: bool,

    /// Number of flow cells to process in parallel
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_create_all_settings(mut settings: CreateAllSettings) -> anyhow::Result<CreateAllSettings> {
    // hard code the version in
    settings.demuxsheet_version = FULL_VERSION.clone();
    info!("demuxsheet version: {:?}", &settings.demuxsheet_version);
    info!("Sub-command: create-all");
    info!("Inputs:");

    check_required_filename(&settings.batch_filename, "Batch file")?;
    check_optional_filename(settings.index_catalogue.as_deref(), "Index catalogue")?;
    info!("\tBatch file: {:?}", &settings.batch_filename);
    if let Some(filename) = settings.index_catalogue.as_deref() {
        info!("\tIndex catalogue: {filename:?}");
    } else {
        info!("\tIndex catalogue: None");
    }

    if let Some(filename) = settings.summary_filename.as_deref() {
        info!("Outputs:");
        info!("\tSummary: {filename:?}");
    }

    info!("Sample sheet parameters:");
    info!("\tDefault BCL converter: {}", settings.bcl_converter);
    info!("\tDry run: {}", if settings.dry_run { "ENABLED" } else { "DISABLED" });
    info!("\tValidation: {}", if settings.force { "DISABLED" } else { "ENABLED" });

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}
