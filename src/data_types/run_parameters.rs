
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::errors::SampleSheetError;

/// The Illumina instrument generations we know how to handle
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize, strum_macros::Display, strum_macros::EnumIter, strum_macros::EnumString)]
pub enum Sequencer {
    /// HiSeq 2500, only ever demultiplexed with bcl2fastq
    #[strum(ascii_case_insensitive, serialize = "HiSeqGA")]
    HiSeqGA,
    /// HiSeq X
    #[strum(ascii_case_insensitive, serialize = "HiSeqX")]
    HiSeqX,
    /// NovaSeq 6000, i5 orientation depends on control software and reagent kit
    #[strum(ascii_case_insensitive, serialize = "NovaSeq6000")]
    NovaSeq6000,
    /// NovaSeq X series
    #[strum(ascii_case_insensitive, serialize = "NovaSeqX")]
    NovaSeqX
}

/// The read structure and instrument details of a single sequencing run.
/// This is a read-only snapshot, typically loaded from JSON next to the run folder.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RunParameters {
    /// Instrument generation that produced the run
    sequencer: Sequencer,
    /// Instrument control software version, e.g. "1.7.0"
    #[serde(default)]
    control_software_version: String,
    /// Reagent kit version, e.g. "1.5"
    #[serde(default)]
    reagent_kit_version: String,
    /// Number of cycles in read 1
    read_1_cycles: u32,
    /// Number of cycles in read 2
    read_2_cycles: u32,
    /// Number of cycles in the index 1 (i7) read
    index_1_cycles: u32,
    /// Number of cycles in the index 2 (i5) read, 0 for single-index runs
    #[serde(default)]
    index_2_cycles: u32
}

impl RunParameters {
    /// Constructor
    /// # Arguments
    /// * `sequencer` - the instrument generation
    /// * `control_software_version` - control software version string, may be empty for older instruments
    /// * `reagent_kit_version` - reagent kit version string, may be empty for older instruments
    /// * `cycles` - (read 1, read 2, index 1, index 2) cycle counts
    pub fn new(
        sequencer: Sequencer, control_software_version: &str, reagent_kit_version: &str,
        cycles: (u32, u32, u32, u32)
    ) -> Self {
        let (read_1_cycles, read_2_cycles, index_1_cycles, index_2_cycles) = cycles;
        Self {
            sequencer,
            control_software_version: control_software_version.to_string(),
            reagent_kit_version: reagent_kit_version.to_string(),
            read_1_cycles, read_2_cycles, index_1_cycles, index_2_cycles
        }
    }

    // mostly getters
    pub fn sequencer(&self) -> Sequencer {
        self.sequencer
    }

    pub fn control_software_version(&self) -> &str {
        &self.control_software_version
    }

    pub fn reagent_kit_version(&self) -> &str {
        &self.reagent_kit_version
    }

    pub fn get_read_1_cycles(&self) -> u32 {
        self.read_1_cycles
    }

    pub fn get_read_2_cycles(&self) -> u32 {
        self.read_2_cycles
    }

    pub fn get_index_1_cycles(&self) -> u32 {
        self.index_1_cycles
    }

    pub fn get_index_2_cycles(&self) -> u32 {
        self.index_2_cycles
    }

    /// Returns true if the run has no i5 index read
    pub fn is_single_index(&self) -> bool {
        self.index_2_cycles == 0
    }
}

/// Compares two dotted version strings numerically, e.g. "1.10" > "1.7.0".
/// Missing components count as 0, so "1.5" == "1.5.0".
/// # Errors
/// * if either version has an empty or non-numeric component
pub fn compare_versions(v1: &str, v2: &str) -> Result<Ordering, SampleSheetError> {
    let p1 = parse_version(v1)?;
    let p2 = parse_version(v2)?;
    let length = p1.len().max(p2.len());
    for i in 0..length {
        let a = p1.get(i).copied().unwrap_or(0);
        let b = p2.get(i).copied().unwrap_or(0);
        match a.cmp(&b) {
            Ordering::Equal => {},
            other => return Ok(other)
        }
    }
    Ok(Ordering::Equal)
}

fn parse_version(version: &str) -> Result<Vec<u64>, SampleSheetError> {
    version.trim().split('.')
        .map(|component| {
            component.parse::<u64>().map_err(|_e| SampleSheetError::InvalidVersion { version: version.to_string() })
        })
        .collect()
}
