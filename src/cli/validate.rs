
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_flow_cell_name, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::sample_sheet_format::BclConverter;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct ValidateSettings {
    #[clap(skip)]
    demuxsheet_version: String,

    /// Full flow cell name, e.g. 230912_A00187_1009_AHK33MDRXY
    #[clap(required = true)]
    #[clap(index = 1)]
    #[clap(value_name = "FLOW_CELL_NAME")]
    #[clap(help_heading = Some("Input/Output"))]
    pub flow_cell_name: String,

    /// Sample sheet to check (CSV)
    #[clap(required = true)]
    #[clap(index = 2)]
    #[clap(value_name = "SHEET_PATH")]
    #[clap(help_heading = Some("Input/Output"))]
    pub sample_sheet: PathBuf,

    /// Demultiplexing software the sheet is meant for
    #[clap(short = 'b')]
    #[clap(long = "bcl-converter")]
    #[clap(value_name = "CONVERTER")]
    #[clap(help_heading = Some("Sample sheet"))]
    #[clap(default_value = "bclconvert")]
    pub bcl_converter: BclConverter,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_validate_settings(mut settings: ValidateSettings) -> anyhow::Result<ValidateSettings> {
    // hard code the version in
    settings.demuxsheet_version = FULL_VERSION.clone();
    info!("demuxsheet version: {:?}", &settings.demuxsheet_version);
    info!("Sub-command: validate");
    info!("Inputs:");

    check_flow_cell_name(&settings.flow_cell_name)?;
    check_required_filename(&settings.sample_sheet, "Sample sheet")?;
    info!("\tSample sheet: {:?}", &settings.sample_sheet);
    info!("\tBCL converter: {}", settings.bcl_converter);

    Ok(settings)
}
