
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

use crate::data_types::run_parameters::RunParameters;
use crate::data_types::sample_sheet_format::BclConverter;
use crate::errors::SampleSheetError;

lazy_static! {
    /// <date>_<instrument>_<run number>_<position><flow cell id>, NovaSeq X uses an 8 digit date
    static ref FLOW_CELL_NAME_RE: Regex = Regex::new(
        r"^(?P<date>[0-9]{6}|[0-9]{8})_(?P<instrument>[A-Za-z0-9-]+)_(?P<run>[0-9]+)_(?P<position>[AB])(?P<id>[A-Za-z0-9]+)$"
    ).unwrap();
}

/// The parsed form of an instrument-generated run folder name, e.g. "230912_A00187_1009_AHK33MDRXY"
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct FlowCellName {
    full_name: String,
    run_date: String,
    instrument: String,
    run_number: u32,
    position: char,
    id: String
}

impl FromStr for FlowCellName {
    type Err = SampleSheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SampleSheetError::InvalidFlowCellName { name: s.to_string() };
        let captures = FLOW_CELL_NAME_RE.captures(s).ok_or_else(invalid)?;
        let run_number: u32 = captures["run"].parse().map_err(|_e| invalid())?;
        let position = captures["position"].chars().next().ok_or_else(invalid)?;
        Ok(Self {
            full_name: s.to_string(),
            run_date: captures["date"].to_string(),
            instrument: captures["instrument"].to_string(),
            run_number,
            position,
            id: captures["id"].to_string()
        })
    }
}

impl Display for FlowCellName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

impl FlowCellName {
    // mostly getters
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn run_date(&self) -> &str {
        &self.run_date
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn run_number(&self) -> u32 {
        self.run_number
    }

    pub fn position(&self) -> char {
        self.position
    }

    /// The flow cell serial without the A/B position prefix
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Everything the creator needs to know about the flow cell it is building a sheet for
#[derive(Clone, Debug)]
pub struct FlowCell {
    /// Parsed run folder name
    name: FlowCellName,
    /// Read structure and instrument of the run
    run_parameters: RunParameters,
    /// The software that will demultiplex this flow cell
    bcl_converter: BclConverter
}

impl FlowCell {
    /// Constructor
    pub fn new(name: FlowCellName, run_parameters: RunParameters, bcl_converter: BclConverter) -> Self {
        Self { name, run_parameters, bcl_converter }
    }

    pub fn name(&self) -> &FlowCellName {
        &self.name
    }

    pub fn run_parameters(&self) -> &RunParameters {
        &self.run_parameters
    }

    pub fn bcl_converter(&self) -> BclConverter {
        self.bcl_converter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novaseq_name() {
        let name: FlowCellName = "230912_A00187_1009_AHK33MDRXY".parse().unwrap();
        assert_eq!(name.run_date(), "230912");
        assert_eq!(name.instrument(), "A00187");
        assert_eq!(name.run_number(), 1009);
        assert_eq!(name.position(), 'A');
        assert_eq!(name.id(), "HK33MDRXY");
        assert_eq!(name.to_string(), "230912_A00187_1009_AHK33MDRXY");
    }

    #[test]
    fn test_other_names() {
        let hiseq_x: FlowCellName = "170407_ST-E00198_0209_BHHKVCALXX".parse().unwrap();
        assert_eq!(hiseq_x.instrument(), "ST-E00198");
        assert_eq!(hiseq_x.run_number(), 209);
        assert_eq!(hiseq_x.position(), 'B');

        let novaseq_x: FlowCellName = "20230508_LH00188_0003_A22522YLT3".parse().unwrap();
        assert_eq!(novaseq_x.run_date(), "20230508");
        assert_eq!(novaseq_x.id(), "22522YLT3");
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "HK33MDRXY", "230912_A00187_1009_CHK33MDRXY", "230912_A00187_AHK33MDRXY", "2309_A00187_1009_AHK33MDRXY"] {
            assert!(matches!(
                name.parse::<FlowCellName>(),
                Err(SampleSheetError::InvalidFlowCellName { .. })
            ), "{name}");
        }
    }
}
