/*!
# Batch creation
Helpers shared by the `create` and `create-all` commands: loading a flow cell from its inputs,
building its sheet, and the get-or-create logic that leaves valid existing sheets alone.
*/

use anyhow::Context;
use derive_builder::Builder;
use log::{error, info, warn};
use std::path::Path;

use crate::data_types::flow_cell::{FlowCell, FlowCellName};
use crate::data_types::sample_sheet_format::{BclConverter, SampleSheetFormat};
use crate::parsing::batch_file::BatchEntry;
use crate::parsing::index_repository::IndexRepository;
use crate::parsing::sample_sheet_reader::read_sample_sheet_content;
use crate::sample_sheet_creator::{ConstructedSampleSheet, CreatorConfigBuilder, SampleSheetCreator};
use crate::util::json_io::{load_lims_samples, load_run_parameters};
use crate::validator::SampleSheetValidator;
use crate::writers::batch_summary::{BatchStatus, BatchSummaryRow};
use crate::writers::sample_sheet_writer::write_sample_sheet;

/// Options that apply to every flow cell of a batch
#[derive(Builder, Clone, Copy, Debug, Default)]
#[builder(default)]
pub struct BatchConfig {
    /// Converter for entries that do not name one
    bcl_converter: BclConverter,
    /// if true, sheets are written without validation
    force: bool,
    /// if true, nothing is written to disk
    dry_run: bool
}

impl BatchConfig {
    pub fn bcl_converter(&self) -> BclConverter {
        self.bcl_converter
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Loads the run parameters of a flow cell and bundles them with its name and converter
/// # Errors
/// * if the run parameters cannot be loaded
pub fn load_flow_cell(flow_cell_name: FlowCellName, run_parameters_fn: &Path, bcl_converter: BclConverter) -> anyhow::Result<FlowCell> {
    let run_parameters = load_run_parameters(run_parameters_fn)?;
    Ok(FlowCell::new(flow_cell_name, run_parameters, bcl_converter))
}

/// Loads the LIMS samples and builds the sheet for a flow cell
/// # Arguments
/// * `flow_cell` - the flow cell to build for
/// * `lims_samples_fn` - JSON file with the LIMS samples
/// * `force` - if true, skip validation of the result
/// * `index_repository` - optional catalogue for index ids
/// # Errors
/// * if the LIMS samples cannot be loaded
/// * if the sheet cannot be constructed or does not validate
pub fn build_sample_sheet(
    flow_cell: &FlowCell, lims_samples_fn: &Path, force: bool, index_repository: Option<&IndexRepository>
) -> anyhow::Result<ConstructedSampleSheet> {
    let lims_samples = load_lims_samples(lims_samples_fn)?;
    let config = CreatorConfigBuilder::default()
        .force(force)
        .build()?;
    let mut creator = SampleSheetCreator::new(flow_cell, &lims_samples, config)?;
    if let Some(repository) = index_repository {
        creator = creator.with_index_repository(repository);
    }
    let sample_sheet = creator.construct_sample_sheet()
        .with_context(|| format!("Error while building the sample sheet for {}:", flow_cell.name()))?;
    Ok(sample_sheet)
}

/// Checks an existing sheet against the flow cell it should belong to.
/// Returns the number of samples if it is usable, None otherwise.
fn check_existing_sheet(filename: &Path, flow_cell_name: &FlowCellName, bcl_converter: BclConverter) -> Option<usize> {
    let content = match read_sample_sheet_content(filename) {
        Ok(c) => c,
        Err(e) => {
            warn!("Existing sample sheet {filename:?} could not be read: {e:#}");
            return None;
        }
    };
    let mut validator = SampleSheetValidator::for_format(&content, SampleSheetFormat::from(bcl_converter));
    let result = validator.validate_run_name(flow_cell_name)
        .and_then(|()| validator.validate());
    match result {
        Ok(sample_sheet) => Some(sample_sheet.samples().len()),
        Err(e) => {
            warn!("Existing sample sheet {filename:?} is not valid: {e}");
            None
        }
    }
}

/// Keeps a valid existing sheet, otherwise builds and writes a new one
/// # Arguments
/// * `entry` - the flow cell and its input/output paths
/// * `config` - batch-wide options
/// * `index_repository` - optional catalogue for index ids
/// # Errors
/// * if loading, building, or writing fails
pub fn get_or_create_sample_sheet(
    entry: &BatchEntry, config: BatchConfig, index_repository: Option<&IndexRepository>
) -> anyhow::Result<BatchSummaryRow> {
    let flow_cell_name = entry.flow_cell_name();
    let bcl_converter = entry.bcl_converter().unwrap_or(config.bcl_converter());
    let sheet_fn = entry.sample_sheet();

    if sheet_fn.exists() {
        if let Some(num_samples) = check_existing_sheet(sheet_fn, flow_cell_name, bcl_converter) {
            info!("Found valid sample sheet for {flow_cell_name} at {sheet_fn:?}");
            return Ok(BatchSummaryRow::success(flow_cell_name.to_string(), BatchStatus::Existing, num_samples, 0));
        }
    }

    let flow_cell = load_flow_cell(flow_cell_name.clone(), entry.run_parameters(), bcl_converter)?;
    let sample_sheet = build_sample_sheet(&flow_cell, entry.lims_samples(), config.force(), index_repository)?;
    let num_rows = sample_sheet.content().len();
    let num_dropped = sample_sheet.dropped_samples().len();
    let num_samples = sample_sheet.num_samples();

    if config.dry_run() {
        info!("Dry run, not writing {num_rows} rows to {sheet_fn:?}");
        return Ok(BatchSummaryRow::success(flow_cell_name.to_string(), BatchStatus::DryRun, num_samples, num_dropped));
    }

    if sheet_fn.exists() {
        warn!("Replacing invalid sample sheet at {sheet_fn:?}");
        std::fs::remove_file(sheet_fn)
            .with_context(|| format!("Error while removing {sheet_fn:?}:"))?;
    }
    if let Some(parent) = sheet_fn.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error while creating folder {parent:?}:"))?;
    }
    write_sample_sheet(sample_sheet.content(), sheet_fn)?;
    Ok(BatchSummaryRow::success(flow_cell_name.to_string(), BatchStatus::Created, num_samples, num_dropped))
}

/// Runs get-or-create for one batch entry, turning any error into a failed row so the batch keeps going
pub fn process_batch_entry(entry: &BatchEntry, config: BatchConfig, index_repository: Option<&IndexRepository>) -> BatchSummaryRow {
    match get_or_create_sample_sheet(entry, config, index_repository) {
        Ok(row) => row,
        Err(e) => {
            error!("Skipping flow cell {}: {e:#}", entry.flow_cell_name());
            BatchSummaryRow::failure(entry.flow_cell_name().to_string(), format!("{e:#}"))
        }
    }
}
