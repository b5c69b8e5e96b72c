
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use log::{LevelFilter, debug, error, info, warn};
use rayon::prelude::*;
use std::time::Instant;

use demuxsheet::batch::{build_sample_sheet, load_flow_cell, process_batch_entry, BatchConfigBuilder};
use demuxsheet::cli::core::{Commands, get_cli};
use demuxsheet::cli::create::{CreateSettings, check_create_settings};
use demuxsheet::cli::create_all::{CreateAllSettings, check_create_all_settings};
use demuxsheet::cli::validate::{ValidateSettings, check_validate_settings};
use demuxsheet::data_types::flow_cell::FlowCellName;
use demuxsheet::data_types::sample_sheet_format::SampleSheetFormat;
use demuxsheet::parsing::batch_file::load_batch_file;
use demuxsheet::parsing::index_repository::IndexRepository;
use demuxsheet::parsing::sample_sheet_reader::read_sample_sheet_content;
use demuxsheet::util::json_io::save_json;
use demuxsheet::util::progress_bar::get_progress_style;
use demuxsheet::validator::SampleSheetValidator;
use demuxsheet::writers::batch_summary::{BatchStatus, BatchSummaryRow, write_batch_summary};
use demuxsheet::writers::sample_sheet_writer::{sample_sheet_to_string, write_sample_sheet};

fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Parses a flow cell name that was already checked with the settings
fn parse_flow_cell_name(flow_cell_name: &str) -> FlowCellName {
    match flow_cell_name.parse() {
        Ok(name) => name,
        Err(e) => {
            error!("Error while parsing flow cell name: {e}");
            std::process::exit(exitcode::CONFIG);
        }
    }
}

fn load_index_repository(opt_filename: Option<&std::path::Path>) -> Option<IndexRepository> {
    opt_filename.map(|filename| {
        info!("Loading index catalogue from {filename:?}...");
        match IndexRepository::from_csv(filename) {
            Ok(repository) => {
                info!("Loaded {} indexes ({} dual).", repository.len(), repository.dual_indexes().len());
                repository
            },
            Err(e) => {
                error!("Error while loading index catalogue: {e:#}");
                std::process::exit(exitcode::IOERR);
            }
        }
    })
}

fn run_validate(settings: ValidateSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);
    let settings = match check_validate_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    let flow_cell_name = parse_flow_cell_name(&settings.flow_cell_name);

    let content = match read_sample_sheet_content(&settings.sample_sheet) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while reading sample sheet: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let mut validator = SampleSheetValidator::for_format(&content, SampleSheetFormat::from(settings.bcl_converter));
    let result = validator.validate_run_name(&flow_cell_name)
        .and_then(|()| validator.validate());
    match result {
        Ok(sample_sheet) => {
            for (lane, samples) in sample_sheet.samples_by_lane().iter() {
                debug!("Lane {lane}: {} samples", samples.len());
            }
            info!("Sample sheet {:?} is valid for {flow_cell_name}.", settings.sample_sheet);
        },
        Err(e) => {
            error!("Sample sheet {:?} is not valid: {e}", settings.sample_sheet);
            std::process::exit(exitcode::DATAERR);
        }
    };

    info!("Validation completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn run_create(settings: CreateSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);
    let settings = match check_create_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    let flow_cell_name = parse_flow_cell_name(&settings.flow_cell_name);
    let index_repository = load_index_repository(settings.index_catalogue.as_deref());

    let flow_cell = match load_flow_cell(flow_cell_name, &settings.run_parameters, settings.bcl_converter) {
        Ok(fc) => fc,
        Err(e) => {
            error!("Error while loading run parameters: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let sample_sheet = match build_sample_sheet(&flow_cell, &settings.lims_samples, settings.force, index_repository.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    if let Some(dropped_fn) = settings.dropped_samples_filename.as_deref() {
        info!("Saving {} dropped samples to {dropped_fn:?}...", sample_sheet.dropped_samples().len());
        if let Err(e) = save_json(&sample_sheet.dropped_samples(), dropped_fn) {
            error!("Error while saving dropped samples: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    if settings.dry_run {
        match sample_sheet_to_string(sample_sheet.content()) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                error!("Error while rendering sample sheet: {e}");
                std::process::exit(exitcode::SOFTWARE);
            }
        }
    } else if let Some(output_fn) = settings.output_filename.as_deref() {
        info!("Saving sample sheet to {output_fn:?}...");
        if let Err(e) = write_sample_sheet(sample_sheet.content(), output_fn) {
            error!("Error while saving sample sheet: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    info!("Sample sheet created in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn run_create_all(settings: CreateAllSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);
    let settings = match check_create_all_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    let index_repository = load_index_repository(settings.index_catalogue.as_deref());
    let entries = match load_batch_file(&settings.batch_filename) {
        Ok(e) => e,
        Err(e) => {
            error!("Error while loading batch file: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let batch_config = match BatchConfigBuilder::default()
        .bcl_converter(settings.bcl_converter)
        .force(settings.force)
        .dry_run(settings.dry_run)
        .build() {
        Ok(bc) => bc,
        Err(e) => {
            error!("Error while building batch config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // each flow cell is independent, so they can all run in parallel
    let style = get_progress_style();
    info!("Processing {} flow cells...", entries.len());
    let rows: Vec<BatchSummaryRow> = entries.par_iter()
        .map(|entry| process_batch_entry(entry, batch_config, index_repository.as_ref()))
        .progress_with_style(style)
        .collect();

    let status_counts = rows.iter().counts_by(|r| r.status());
    let count_status = |status: BatchStatus| status_counts.get(&status).copied().unwrap_or(0);
    let num_failed = count_status(BatchStatus::Failed);
    info!("Existing:created:dry-run:failed flow cells: {} : {} : {} : {num_failed}",
        count_status(BatchStatus::Existing), count_status(BatchStatus::Created), count_status(BatchStatus::DryRun));

    if let Some(summary_fn) = settings.summary_filename.as_deref() {
        info!("Saving batch summary to {summary_fn:?}...");
        if let Err(e) = write_batch_summary(&rows, summary_fn) {
            error!("Error while saving batch summary: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    if num_failed > 0 {
        for row in rows.iter().filter(|r| r.status() == BatchStatus::Failed) {
            warn!("Failed flow cell: {}", row.flow_cell());
        }
        error!("{num_failed} flow cells failed.");
        std::process::exit(exitcode::DATAERR);
    }

    info!("Batch completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Validate(settings) => {
            run_validate(*settings);
        },
        Commands::Create(settings) => {
            run_create(*settings);
        },
        Commands::CreateAll(settings) => {
            run_create_all(*settings);
        }
    }

    info!("Process finished successfully.");
}
