
use anyhow::bail;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_flow_cell_name, check_optional_filename, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::sample_sheet_format::BclConverter;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct CreateSettings {
    #[clap(skip)]
    demuxsheet_version: String,

    /// Full flow cell name, e.g. 230912_A00187_1009_AHK33MDRXY
    #[clap(required = true)]
    #[clap(index = 1)]
    #[clap(value_name = "FLOW_CELL_NAME")]
    #[clap(help_heading = Some("Input/Output"))]
    pub flow_cell_name: String,

    /// Run parameters of the flow cell (JSON)
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "run-parameters")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub run_parameters: PathBuf,

    /// LIMS samples on the flow cell (JSON)
    #[clap(required = true)]
    #[clap(short = 'l')]
    #[clap(long = "lims-samples")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub lims_samples: PathBuf,

    /// Optional index catalogue to translate index ids into sequences (CSV)
    #[clap(long = "index-catalogue")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub index_catalogue: Option<PathBuf>,

    /// Output sample sheet (CSV); must not exist yet
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "CSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: Option<PathBuf>,

    /// Optional report of the LIMS samples left out of the sheet (JSON)
    #[clap(long = "dropped-samples")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub dropped_samples_filename: Option<PathBuf>,

    /// Demultiplexing software the sheet is built for
    #[clap(short = 'b')]
    #[clap(long = "bcl-converter")]
    #[clap(value_name = "CONVERTER")]
    #[clap(help_heading = Some("Sample sheet"))]
    #[clap(default_value = "bclconvert")]
    pub bcl_converter: BclConverter,

    /// Prints the sheet instead of writing it
    #[clap(long = "dry-run")]
    #[clap(help_heading = Some("Sample sheet"))]
    pub dry_run: bool,

    /// Skips validation of the built sheet
    #[clap(long = "force")]
    #[clap(help_heading = Some("Sample sheet"))]
    pub force: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_create_settings(mut settings: CreateSettings) -> anyhow::Result<CreateSettings> {
    // hard code the version in
    settings.demuxsheet_version = FULL_VERSION.clone();
    info!("demuxsheet version: {:?}", &settings.demuxsheet_version);
    info!("Sub-command: create");
    info!("Inputs:");

    check_flow_cell_name(&settings.flow_cell_name)?;
    check_required_filename(&settings.run_parameters, "Run parameters")?;
    check_required_filename(&settings.lims_samples, "LIMS samples")?;
    check_optional_filename(settings.index_catalogue.as_deref(), "Index catalogue")?;
    info!("\tRun parameters: {:?}", &settings.run_parameters);
    info!("\tLIMS samples: {:?}", &settings.lims_samples);
    if let Some(filename) = settings.index_catalogue.as_deref() {
        info!("\tIndex catalogue: {filename:?}");
    } else {
        info!("\tIndex catalogue: None");
    }

    info!("Outputs:");
    match settings.output_filename.as_deref() {
        Some(filename) => {
            if !settings.dry_run && filename.exists() {
                bail!("Output sample sheet already exists: \"{}\"", filename.display());
            }
            info!("\tSample sheet: {filename:?}");
        },
        None => {
            if !settings.dry_run {
                bail!("--output is required unless --dry-run is set");
            }
            info!("\tSample sheet: stdout");
        }
    };
    if let Some(filename) = settings.dropped_samples_filename.as_deref() {
        info!("\tDropped samples: {filename:?}");
    }

    info!("Sample sheet parameters:");
    info!("\tBCL converter: {}", settings.bcl_converter);
    info!("\tDry run: {}", if settings.dry_run { "ENABLED" } else { "DISABLED" });
    info!("\tValidation: {}", if settings.force { "DISABLED" } else { "ENABLED" });

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CreateSettings {
        CreateSettings {
            flow_cell_name: "230912_A00187_1009_AHK33MDRXY".to_string(),
            run_parameters: PathBuf::from("test_data/run_parameters/novaseq_6000_post_1_5.json"),
            lims_samples: PathBuf::from("test_data/lims/lims_samples.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_output_required() {
        assert!(check_create_settings(settings()).is_err());

        let dry_run = CreateSettings { dry_run: true, ..settings() };
        assert!(check_create_settings(dry_run).is_ok());

        // an existing sheet is never overwritten
        let existing = CreateSettings {
            output_filename: Some(PathBuf::from("test_data/sample_sheets/valid_bcl_convert.csv")),
            ..settings()
        };
        assert!(check_create_settings(existing).is_err());
    }
}
