
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// The demultiplexing software a flow cell is processed with
#[derive(Clone, Copy, Default, Debug, Eq, Hash, PartialEq, strum_macros::Display, EnumString, Deserialize, Serialize, clap::ValueEnum)]
pub enum BclConverter {
    /// Legacy Illumina bcl2fastq
    #[strum(ascii_case_insensitive, serialize = "bcl2fastq")]
    #[value(name = "bcl2fastq")]
    #[serde(rename = "bcl2fastq")]
    Bcl2fastq,
    /// BCLConvert, also used for Dragen-based demultiplexing
    #[default]
    #[strum(ascii_case_insensitive, to_string = "bclconvert", serialize = "dragen")]
    #[value(name = "bclconvert", alias = "dragen")]
    #[serde(rename = "bclconvert", alias = "dragen")]
    BclConvert
}

/// The flavours of sample sheet we can generate and read
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display, Serialize)]
pub enum SampleSheetFormat {
    /// `[Data]` sheets consumed by bcl2fastq
    #[strum(serialize = "Bcl2Fastq")]
    Bcl2Fastq,
    /// `[BCLConvert_Data]` sheets consumed by BCLConvert and Dragen
    #[strum(serialize = "BCLConvert")]
    BclConvert
}

impl From<BclConverter> for SampleSheetFormat {
    fn from(bcl_converter: BclConverter) -> Self {
        match bcl_converter {
            BclConverter::Bcl2fastq => SampleSheetFormat::Bcl2Fastq,
            BclConverter::BclConvert => SampleSheetFormat::BclConvert
        }
    }
}

impl SampleSheetFormat {
    /// The marker row that opens the data section for this format
    pub fn data_marker(&self) -> &'static str {
        match self {
            SampleSheetFormat::Bcl2Fastq => crate::data_types::sections::BCL2FASTQ_DATA,
            SampleSheetFormat::BclConvert => crate::data_types::sections::BCLCONVERT_DATA
        }
    }

    /// The ordered data column names for this format
    pub fn column_names(&self) -> &'static [&'static str] {
        match self {
            SampleSheetFormat::Bcl2Fastq => crate::data_types::sections::BCL2FASTQ_COLUMNS,
            SampleSheetFormat::BclConvert => crate::data_types::sections::BCLCONVERT_COLUMNS
        }
    }
}
