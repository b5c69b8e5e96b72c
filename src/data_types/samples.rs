
use serde::{de, Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::data_types::sample_sheet_format::SampleSheetFormat;
use crate::data_types::sections::*;
use crate::errors::SampleSheetError;
use crate::index_math::is_dual_index;

/// Number of tolerated mismatches when nothing else in the lane is close
pub const DEFAULT_BARCODE_MISMATCHES: u8 = 1;
/// Written to the i5 mismatch column when a sample has no i5
pub const NOT_APPLICABLE: &str = "na";

/// A sample as delivered by the LIMS; this is never modified once loaded
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LimsSample {
    /// The flow cell identifier the sample was pooled on
    #[serde(default)]
    pub flowcell_id: String,
    /// Lane the sample is loaded in, 1-based
    pub lane: u32,
    /// Internal sample identifier
    pub sample_id: String,
    /// Index sequence, either the i7 alone or "i7-i5"; may also be an index catalogue id
    pub index: String,
    /// Separate i5 sequence when not provided in `index`
    #[serde(default)]
    pub index2: Option<String>,
    /// Customer-facing sample name
    #[serde(default)]
    pub sample_name: String,
    /// Project or ticket the sample belongs to
    #[serde(default)]
    pub project: String
}

impl LimsSample {
    /// True if the sample carries an i5, either combined into `index` or in the separate `index2` field
    pub fn is_dual_index(&self) -> bool {
        is_dual_index(&self.index) ||
            self.index2.as_deref().is_some_and(|index2| !index2.trim().is_empty())
    }
}

/// A LIMS sample after index adaptation: split into i7/i5, reverse complemented and padded as required
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexedSample<'a> {
    /// The LIMS record
    lims: &'a LimsSample,
    /// Final i7 sequence
    index: String,
    /// Final i5 sequence, empty for single-index runs
    index2: String
}

impl<'a> IndexedSample<'a> {
    /// Constructor
    pub fn new(lims: &'a LimsSample, index: String, index2: String) -> Self {
        Self { lims, index, index2 }
    }

    // mostly getters
    pub fn lims(&self) -> &LimsSample {
        self.lims
    }

    pub fn lane(&self) -> u32 {
        self.lims.lane
    }

    pub fn sample_id(&self) -> &str {
        &self.lims.sample_id
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn index2(&self) -> &str {
        &self.index2
    }
}

/// The i5 barcode mismatch value, which can be "na" when there is no i5 to compare
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BarcodeMismatches2 {
    Count(u8),
    NotApplicable
}

impl Default for BarcodeMismatches2 {
    fn default() -> Self {
        BarcodeMismatches2::Count(DEFAULT_BARCODE_MISMATCHES)
    }
}

impl Display for BarcodeMismatches2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarcodeMismatches2::Count(count) => write!(f, "{count}"),
            BarcodeMismatches2::NotApplicable => write!(f, "{NOT_APPLICABLE}")
        }
    }
}

impl FromStr for BarcodeMismatches2 {
    type Err = SampleSheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NOT_APPLICABLE {
            return Ok(BarcodeMismatches2::NotApplicable);
        }
        s.parse::<u8>()
            .map(BarcodeMismatches2::Count)
            .map_err(|_e| SampleSheetError::InvalidNumber { field: BARCODE_MISMATCHES_INDEX_2, value: s.to_string() })
    }
}

fn barcode_mismatches_2_from_string<'de, D>(deserializer: D) -> Result<BarcodeMismatches2, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(|_e| de::Error::invalid_value(
        de::Unexpected::Str(&value),
        &"an integer or \"na\"",
    ))
}

/// The values the creator computes for each sample, kept apart until the per-lane pass is done
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DerivedAttributes {
    pub override_cycles: String,
    pub barcode_mismatches_1: u8,
    pub barcode_mismatches_2: BarcodeMismatches2
}

/// One data row of a bcl2fastq sheet
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Bcl2FastqSample {
    #[serde(rename = "FCID")]
    pub flowcell_id: String,
    #[serde(rename = "Lane")]
    pub lane: u32,
    #[serde(rename = "SampleID")]
    pub sample_id: String,
    #[serde(rename = "SampleRef", default = "default_sample_ref")]
    pub sample_ref: String,
    #[serde(rename = "index")]
    pub index: String,
    #[serde(rename = "index2", default)]
    pub index2: String,
    #[serde(rename = "SampleName", default)]
    pub sample_name: String,
    #[serde(rename = "Control", default = "default_control")]
    pub control: String,
    #[serde(rename = "Recipe", default = "default_recipe")]
    pub recipe: String,
    #[serde(rename = "Operator", default = "default_operator")]
    pub operator: String,
    #[serde(rename = "Project", default)]
    pub project: String
}

fn default_sample_ref() -> String {
    "hg19".to_string()
}

fn default_control() -> String {
    "N".to_string()
}

fn default_recipe() -> String {
    "R1".to_string()
}

fn default_operator() -> String {
    "script".to_string()
}

fn default_barcode_mismatches() -> u8 {
    DEFAULT_BARCODE_MISMATCHES
}

/// One data row of a BCLConvert sheet
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct BclConvertSample {
    #[serde(rename = "Lane")]
    pub lane: u32,
    #[serde(rename = "Sample_ID")]
    pub sample_id: String,
    #[serde(rename = "Index")]
    pub index: String,
    #[serde(rename = "Index2", default)]
    pub index2: String,
    #[serde(rename = "OverrideCycles", default)]
    pub override_cycles: String,
    #[serde(rename = "AdapterRead1", default)]
    pub adapter_read_1: String,
    #[serde(rename = "AdapterRead2", default)]
    pub adapter_read_2: String,
    #[serde(rename = "BarcodeMismatchesIndex1", default = "default_barcode_mismatches")]
    pub barcode_mismatches_1: u8,
    #[serde(rename = "BarcodeMismatchesIndex2", default, deserialize_with = "barcode_mismatches_2_from_string")]
    pub barcode_mismatches_2: BarcodeMismatches2
}

/// A sample row of either sheet format
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlowCellSample {
    Bcl2Fastq(Bcl2FastqSample),
    BclConvert(BclConvertSample)
}

impl FlowCellSample {
    /// Builds a bcl2fastq row from an index-adapted LIMS sample
    pub fn new_bcl2fastq(sample: &IndexedSample) -> Self {
        let lims = sample.lims();
        FlowCellSample::Bcl2Fastq(Bcl2FastqSample {
            flowcell_id: lims.flowcell_id.clone(),
            lane: lims.lane,
            sample_id: lims.sample_id.clone(),
            sample_ref: default_sample_ref(),
            index: sample.index().to_string(),
            index2: sample.index2().to_string(),
            sample_name: lims.sample_name.clone(),
            control: default_control(),
            recipe: default_recipe(),
            operator: default_operator(),
            project: lims.project.clone()
        })
    }

    /// Combines an index-adapted LIMS sample with its derived attributes into a BCLConvert row
    pub fn new_bcl_convert(sample: &IndexedSample, derived: DerivedAttributes) -> Self {
        FlowCellSample::BclConvert(BclConvertSample {
            lane: sample.lane(),
            sample_id: sample.sample_id().to_string(),
            index: sample.index().to_string(),
            index2: sample.index2().to_string(),
            override_cycles: derived.override_cycles,
            adapter_read_1: String::new(),
            adapter_read_2: String::new(),
            barcode_mismatches_1: derived.barcode_mismatches_1,
            barcode_mismatches_2: derived.barcode_mismatches_2
        })
    }

    /// Deserializes a data row using the column-name row
    /// # Arguments
    /// * `sample_format` - which row type to produce
    /// * `headers` - the data section column names
    /// * `record` - a single data row
    /// # Errors
    /// * if a field does not parse, e.g. a non-numeric lane
    /// * if the row breaks a sample invariant (lane 0, empty id)
    pub fn from_record(
        sample_format: SampleSheetFormat, headers: &csv::StringRecord, record: &csv::StringRecord
    ) -> Result<Self, SampleSheetError> {
        let sample = match sample_format {
            SampleSheetFormat::Bcl2Fastq => FlowCellSample::Bcl2Fastq(record.deserialize(Some(headers))?),
            SampleSheetFormat::BclConvert => FlowCellSample::BclConvert(record.deserialize(Some(headers))?)
        };
        sample.check_invariants()?;
        Ok(sample)
    }

    fn check_invariants(&self) -> Result<(), SampleSheetError> {
        if self.sample_id().is_empty() {
            return Err(SampleSheetError::EmptySampleId { lane: self.lane() });
        }
        if self.lane() < 1 {
            return Err(SampleSheetError::InvalidLane { sample_id: self.sample_id().to_string(), lane: self.lane() });
        }
        Ok(())
    }

    pub fn format(&self) -> SampleSheetFormat {
        match self {
            FlowCellSample::Bcl2Fastq(_) => SampleSheetFormat::Bcl2Fastq,
            FlowCellSample::BclConvert(_) => SampleSheetFormat::BclConvert
        }
    }

    pub fn lane(&self) -> u32 {
        match self {
            FlowCellSample::Bcl2Fastq(s) => s.lane,
            FlowCellSample::BclConvert(s) => s.lane
        }
    }

    pub fn sample_id(&self) -> &str {
        match self {
            FlowCellSample::Bcl2Fastq(s) => &s.sample_id,
            FlowCellSample::BclConvert(s) => &s.sample_id
        }
    }

    /// The sample id up to the first underscore, which is what must be unique within a lane
    pub fn sample_id_prefix(&self) -> &str {
        let sample_id = self.sample_id();
        sample_id.split('_').next().unwrap_or(sample_id)
    }

    pub fn index(&self) -> &str {
        match self {
            FlowCellSample::Bcl2Fastq(s) => &s.index,
            FlowCellSample::BclConvert(s) => &s.index
        }
    }

    pub fn index2(&self) -> &str {
        match self {
            FlowCellSample::Bcl2Fastq(s) => &s.index2,
            FlowCellSample::BclConvert(s) => &s.index2
        }
    }

    /// Returns the string value of a column by its sheet alias, None if the column is not part of this format
    pub fn field(&self, column: &str) -> Option<String> {
        match self {
            FlowCellSample::Bcl2Fastq(s) => match column {
                FLOW_CELL_ID => Some(s.flowcell_id.clone()),
                LANE => Some(s.lane.to_string()),
                BCL2FASTQ_SAMPLE_ID => Some(s.sample_id.clone()),
                SAMPLE_REF => Some(s.sample_ref.clone()),
                BCL2FASTQ_INDEX_1 => Some(s.index.clone()),
                BCL2FASTQ_INDEX_2 => Some(s.index2.clone()),
                SAMPLE_NAME => Some(s.sample_name.clone()),
                CONTROL => Some(s.control.clone()),
                RECIPE => Some(s.recipe.clone()),
                OPERATOR => Some(s.operator.clone()),
                PROJECT => Some(s.project.clone()),
                _ => None
            },
            FlowCellSample::BclConvert(s) => match column {
                LANE => Some(s.lane.to_string()),
                BCLCONVERT_SAMPLE_ID => Some(s.sample_id.clone()),
                BCLCONVERT_INDEX_1 => Some(s.index.clone()),
                BCLCONVERT_INDEX_2 => Some(s.index2.clone()),
                OVERRIDE_CYCLES => Some(s.override_cycles.clone()),
                ADAPTER_READ_1 => Some(s.adapter_read_1.clone()),
                ADAPTER_READ_2 => Some(s.adapter_read_2.clone()),
                BARCODE_MISMATCHES_INDEX_1 => Some(s.barcode_mismatches_1.to_string()),
                BARCODE_MISMATCHES_INDEX_2 => Some(s.barcode_mismatches_2.to_string()),
                _ => None
            }
        }
    }

    /// Serializes the sample into a data row in the declared column order of its format
    pub fn to_row(&self) -> Vec<String> {
        self.format().column_names().iter()
            .map(|column| self.field(column).unwrap_or_default())
            .collect()
    }
}
