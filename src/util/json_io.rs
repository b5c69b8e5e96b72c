
use anyhow::{ensure, Context};
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::data_types::run_parameters::RunParameters;
use crate::data_types::samples::LimsSample;

/// Opens a file for reading, transparently decompressing ".gz" files
fn open_reader(filename: &Path) -> anyhow::Result<Box<dyn Read>> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let reader: Box<dyn Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(flate2::read::MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Loads a JSON file (optionally gzipped) into any deserializable type
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> anyhow::Result<T> {
    let reader = open_reader(filename)?;
    let result: T = serde_json::from_reader(reader)
        .with_context(|| format!("Error while deserializing {filename:?}:"))?;
    Ok(result)
}

/// Saves a serializable value as pretty JSON, gzipped if the path ends in ".gz"
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let file = File::create(out_filename)
        .with_context(|| format!("Error while creating {out_filename:?}:"))?;
    let file: Box<dyn Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(flate2::write::GzEncoder::new(file, flate2::Compression::best()))
    } else {
        Box::new(file)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;
    Ok(())
}

/// Loads the run parameters snapshot of a flow cell
/// # Errors
/// * if the file cannot be loaded
/// * if read 1 or index 1 has no cycles
pub fn load_run_parameters(filename: &Path) -> anyhow::Result<RunParameters> {
    let run_parameters: RunParameters = load_json(filename)?;
    ensure!(run_parameters.get_read_1_cycles() > 0, "Read 1 must have cycles in {filename:?}");
    ensure!(run_parameters.get_index_1_cycles() > 0, "Index 1 must have cycles in {filename:?}");
    debug!("Loaded run parameters from {filename:?}: {run_parameters:?}");
    Ok(run_parameters)
}

/// Loads the LIMS samples of a flow cell from a JSON array
/// # Errors
/// * if the file cannot be loaded
pub fn load_lims_samples(filename: &Path) -> anyhow::Result<Vec<LimsSample>> {
    let lims_samples: Vec<LimsSample> = load_json(filename)?;
    debug!("Loaded {} LIMS samples from {filename:?}", lims_samples.len());
    Ok(lims_samples)
}
