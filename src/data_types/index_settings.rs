
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;

use crate::data_types::run_parameters::{compare_versions, RunParameters, Sequencer};
use crate::errors::SampleSheetError;

/// NovaSeq 6000 control software from this version onwards reports the i5 in reverse complement
pub const NEW_NOVASEQ_CONTROL_SOFTWARE_VERSION: &str = "1.7.0";
/// NovaSeq 6000 reagent kits from this version onwards use the new i5 chemistry
pub const NEW_NOVASEQ_REAGENT_KIT_VERSION: &str = "1.5";

/// Describes how the i5 index needs to be handled for a particular instrument and chemistry
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct IndexSettings {
    /// Name written to the sample sheet header so a validator can recover the preset
    name: &'static str,
    /// if true, the LIMS i5 sequence gets reverse complemented before it is written
    should_i5_be_reverse_complemented: bool,
    /// if true, the i5 override cycles and comparisons are anchored at the end of the read
    are_i5_override_cycles_reverse_complemented: bool
}

/// NovaSeq 6000 runs with control software >= 1.7.0 and reagent kits >= 1.5
pub const NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS: IndexSettings = IndexSettings {
    name: "NovaSeq6000Post1.5Kits",
    should_i5_be_reverse_complemented: true,
    are_i5_override_cycles_reverse_complemented: false
};

/// Everything that reads the i5 in forward orientation
pub const NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS: IndexSettings = IndexSettings {
    name: "NoReverseComplements",
    should_i5_be_reverse_complemented: false,
    are_i5_override_cycles_reverse_complemented: false
};

/// NovaSeq X runs
pub const NOVASEQ_X_INDEX_SETTINGS: IndexSettings = IndexSettings {
    name: "NovaSeqX",
    should_i5_be_reverse_complemented: false,
    are_i5_override_cycles_reverse_complemented: true
};

const ALL_INDEX_SETTINGS: [IndexSettings; 3] = [
    NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS,
    NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS,
    NOVASEQ_X_INDEX_SETTINGS
];

impl IndexSettings {
    // mostly getters
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn should_i5_be_reverse_complemented(&self) -> bool {
        self.should_i5_be_reverse_complemented
    }

    pub fn are_i5_override_cycles_reverse_complemented(&self) -> bool {
        self.are_i5_override_cycles_reverse_complemented
    }

    /// Looks up a preset by the name written in a sample sheet header
    /// # Arguments
    /// * `name` - the preset name, e.g. "NovaSeqX"
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_INDEX_SETTINGS.into_iter()
            .find(|settings| settings.name == name)
    }
}

/// Selects the index settings preset for a run.
/// Only NovaSeq 6000 runs depend on the software/kit versions; NovaSeq X always has its own preset.
/// # Arguments
/// * `run_parameters` - the run we are building a sheet for
/// # Errors
/// * if a NovaSeq 6000 run carries unparseable version strings
pub fn get_index_settings(run_parameters: &RunParameters) -> Result<IndexSettings, SampleSheetError> {
    let settings = match run_parameters.sequencer() {
        Sequencer::NovaSeqX => NOVASEQ_X_INDEX_SETTINGS,
        Sequencer::NovaSeq6000 => {
            if is_novaseq_6000_post_1_5_kit(run_parameters)? {
                NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS
            } else {
                NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS
            }
        },
        Sequencer::HiSeqGA |
        Sequencer::HiSeqX => NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS
    };
    debug!("Selected index settings {} for {}", settings.name(), run_parameters.sequencer());
    Ok(settings)
}

fn is_novaseq_6000_post_1_5_kit(run_parameters: &RunParameters) -> Result<bool, SampleSheetError> {
    let new_software = compare_versions(
        run_parameters.control_software_version(), NEW_NOVASEQ_CONTROL_SOFTWARE_VERSION
    )? != Ordering::Less;
    let new_kit = compare_versions(
        run_parameters.reagent_kit_version(), NEW_NOVASEQ_REAGENT_KIT_VERSION
    )? != Ordering::Less;
    Ok(new_software && new_kit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novaseq_6000(software: &str, kit: &str) -> RunParameters {
        RunParameters::new(Sequencer::NovaSeq6000, software, kit, (151, 151, 10, 10))
    }

    #[test]
    fn test_novaseq_6000_presets() {
        assert_eq!(get_index_settings(&novaseq_6000("1.7.0", "1.5")).unwrap(), NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS);
        assert_eq!(get_index_settings(&novaseq_6000("1.8.1", "1.5.1")).unwrap(), NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS);
        // both thresholds must be met
        assert_eq!(get_index_settings(&novaseq_6000("1.6.0", "1.5")).unwrap(), NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS);
        assert_eq!(get_index_settings(&novaseq_6000("1.7.0", "1.0")).unwrap(), NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS);
        assert!(get_index_settings(&novaseq_6000("", "1.5")).is_err());
    }

    #[test]
    fn test_other_presets() {
        let novaseq_x = RunParameters::new(Sequencer::NovaSeqX, "1.0.0", "", (151, 151, 10, 10));
        assert_eq!(get_index_settings(&novaseq_x).unwrap(), NOVASEQ_X_INDEX_SETTINGS);

        // versions are never inspected for the HiSeq
        let hiseq_x = RunParameters::new(Sequencer::HiSeqX, "", "", (151, 151, 8, 8));
        assert_eq!(get_index_settings(&hiseq_x).unwrap(), NO_REVERSE_COMPLEMENTS_INDEX_SETTINGS);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(IndexSettings::from_name("NovaSeqX"), Some(NOVASEQ_X_INDEX_SETTINGS));
        assert_eq!(IndexSettings::from_name("NovaSeq6000Post1.5Kits"), Some(NOVASEQ_6000_POST_1_5_KITS_INDEX_SETTINGS));
        assert_eq!(IndexSettings::from_name("unknown"), None);
    }
}
