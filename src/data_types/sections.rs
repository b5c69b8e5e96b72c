//! Literal markers and keys of the sample sheet sections.

// section markers
pub const HEADER: &str = "[Header]";
pub const READS: &str = "[Reads]";
pub const BCL2FASTQ_SETTINGS: &str = "[Settings]";
pub const BCLCONVERT_SETTINGS: &str = "[BCLConvert_Settings]";
pub const BCL2FASTQ_DATA: &str = "[Data]";
pub const BCLCONVERT_DATA: &str = "[BCLConvert_Data]";

// [Header] keys
pub const FILE_FORMAT_VERSION: &str = "FileFormatVersion";
pub const FILE_FORMAT_VERSION_VALUE: &str = "2";
pub const RUN_NAME: &str = "RunName";
pub const INSTRUMENT_PLATFORM: &str = "InstrumentPlatform";
pub const INDEX_ORIENTATION: &str = "IndexOrientation";
pub const INDEX_ORIENTATION_FORWARD: &str = "Forward";
pub const INDEX_SETTINGS: &str = "IndexSettings";

// [Reads] keys
pub const READ_1_CYCLES: &str = "Read1Cycles";
pub const READ_2_CYCLES: &str = "Read2Cycles";
pub const INDEX_1_CYCLES: &str = "Index1Cycles";
pub const INDEX_2_CYCLES: &str = "Index2Cycles";

// settings keys
pub const SOFTWARE_VERSION: &str = "SoftwareVersion";
pub const BCLCONVERT_SOFTWARE_VERSION: &str = "4.1.7";
pub const FASTQ_COMPRESSION_FORMAT: &str = "FastqCompressionFormat";
pub const FASTQ_COMPRESSION_FORMAT_VALUE: &str = "gzip";
pub const BARCODE_MISMATCHES_INDEX_1: &str = "BarcodeMismatchesIndex1";
pub const BARCODE_MISMATCHES_INDEX_2: &str = "BarcodeMismatchesIndex2";

// bcl2fastq data columns
pub const FLOW_CELL_ID: &str = "FCID";
pub const LANE: &str = "Lane";
pub const BCL2FASTQ_SAMPLE_ID: &str = "SampleID";
pub const SAMPLE_REF: &str = "SampleRef";
pub const BCL2FASTQ_INDEX_1: &str = "index";
pub const BCL2FASTQ_INDEX_2: &str = "index2";
pub const SAMPLE_NAME: &str = "SampleName";
pub const CONTROL: &str = "Control";
pub const RECIPE: &str = "Recipe";
pub const OPERATOR: &str = "Operator";
pub const PROJECT: &str = "Project";

// BCLConvert data columns
pub const BCLCONVERT_SAMPLE_ID: &str = "Sample_ID";
pub const BCLCONVERT_INDEX_1: &str = "Index";
pub const BCLCONVERT_INDEX_2: &str = "Index2";
pub const OVERRIDE_CYCLES: &str = "OverrideCycles";
pub const ADAPTER_READ_1: &str = "AdapterRead1";
pub const ADAPTER_READ_2: &str = "AdapterRead2";

pub const BCL2FASTQ_COLUMNS: &[&str] = &[
    FLOW_CELL_ID, LANE, BCL2FASTQ_SAMPLE_ID, SAMPLE_REF, BCL2FASTQ_INDEX_1, BCL2FASTQ_INDEX_2,
    SAMPLE_NAME, CONTROL, RECIPE, OPERATOR, PROJECT
];

pub const BCLCONVERT_COLUMNS: &[&str] = &[
    LANE, BCLCONVERT_SAMPLE_ID, BCLCONVERT_INDEX_1, BCLCONVERT_INDEX_2, OVERRIDE_CYCLES,
    ADAPTER_READ_1, ADAPTER_READ_2, BARCODE_MISMATCHES_INDEX_1, BARCODE_MISMATCHES_INDEX_2
];

/// First cells that identify the column-name row of a data section
pub const DATA_HEADER_TOKENS: &[&str] = &[FLOW_CELL_ID, LANE];
