/*!
# Sample sheet creator
Builds the sample sheet content for a flow cell from its LIMS samples.
Samples without a dual index are dropped, indexes are adapted to the instrument chemistry,
and for BCLConvert sheets the override cycles and barcode mismatches are derived lane by lane.
Unless forced, the assembled content is re-parsed and validated before it is returned.

## Example usage
```rust
use demuxsheet::data_types::flow_cell::FlowCell;
use demuxsheet::data_types::run_parameters::{RunParameters, Sequencer};
use demuxsheet::data_types::sample_sheet_format::BclConverter;
use demuxsheet::data_types::samples::LimsSample;
use demuxsheet::sample_sheet_creator::{CreatorConfig, SampleSheetCreator};

let run_parameters = RunParameters::new(Sequencer::NovaSeqX, "1.0.0", "1.0", (151, 151, 8, 8));
let flow_cell = FlowCell::new(
    "20230508_LH00188_0003_A22522YLT3".parse().unwrap(), run_parameters, BclConverter::BclConvert
);
let lims_samples = vec![
    LimsSample { lane: 1, sample_id: "ACC1".to_string(), index: "ATCACGTT-GCACTGAA".to_string(), ..Default::default() },
    LimsSample { lane: 1, sample_id: "ACC2".to_string(), index: "GGCTACAG".to_string(), ..Default::default() },
];

let creator = SampleSheetCreator::new(&flow_cell, &lims_samples, CreatorConfig::default()).unwrap();
let sheet = creator.construct_sample_sheet().unwrap();

// the single-index sample does not make it into the sheet
assert_eq!(sheet.dropped_samples().len(), 1);
assert_eq!(sheet.content().last().unwrap(), &vec![
    "1", "ACC1", "ATCACGTT", "GCACTGAA", "Y151;I8;I8;Y151", "", "", "1", "1"
]);
```
*/
use derive_builder::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::data_types::flow_cell::FlowCell;
use crate::data_types::index_settings::{get_index_settings, IndexSettings};
use crate::data_types::run_parameters::Sequencer;
use crate::data_types::sample_sheet_format::{BclConverter, SampleSheetFormat};
use crate::data_types::samples::{BarcodeMismatches2, DerivedAttributes, FlowCellSample, IndexedSample, LimsSample, DEFAULT_BARCODE_MISMATCHES};
use crate::data_types::sections::*;
use crate::errors::SampleSheetError;
use crate::index_math::{
    get_hamming_distance_index_1, get_hamming_distance_index_2, get_index_pair, get_override_cycles,
    get_reverse_complement, is_padding_needed, pad_index_one, pad_index_two, MINIMUM_HAMMING_DISTANCE
};
use crate::parsing::index_repository::IndexRepository;
use crate::validator::SampleSheetValidator;

/// Controls how a sheet gets built
#[derive(Builder, Clone, Copy, Debug, Default)]
#[builder(default)]
pub struct CreatorConfig {
    /// if true, the assembled sheet is returned without validation
    force: bool,
    /// If Some(format), this format is built instead of the one implied by the flow cell converter
    sheet_format: Option<SampleSheetFormat>
}

impl CreatorConfig {
    // mostly getters
    pub fn force(&self) -> bool {
        self.force
    }

    pub fn sheet_format(&self) -> Option<SampleSheetFormat> {
        self.sheet_format
    }
}

/// The result of a construction pass
#[derive(Clone, Debug, Serialize)]
pub struct ConstructedSampleSheet {
    /// Rows of the sheet, ready to be written as CSV
    content: Vec<Vec<String>>,
    /// Number of sample rows in `content`
    num_samples: usize,
    /// LIMS samples that were left out because they lack a dual index
    dropped_samples: Vec<LimsSample>
}

impl ConstructedSampleSheet {
    pub fn content(&self) -> &[Vec<String>] {
        &self.content
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn dropped_samples(&self) -> &[LimsSample] {
        &self.dropped_samples
    }

    /// Consumes the result, returning only the content
    pub fn into_content(self) -> Vec<Vec<String>> {
        self.content
    }
}

/// Returns the `InstrumentPlatform` header value for a sequencer, None if BCLConvert cannot handle it
pub fn get_instrument_platform(sequencer: Sequencer) -> Option<&'static str> {
    match sequencer {
        Sequencer::NovaSeq6000 => Some("NovaSeq6000"),
        Sequencer::NovaSeqX => Some("NovaSeqXSeries"),
        Sequencer::HiSeqGA |
        Sequencer::HiSeqX => None
    }
}

fn is_sequencer_supported(sheet_format: SampleSheetFormat, sequencer: Sequencer) -> bool {
    match sheet_format {
        SampleSheetFormat::BclConvert => get_instrument_platform(sequencer).is_some(),
        SampleSheetFormat::Bcl2Fastq => matches!(sequencer, Sequencer::HiSeqX | Sequencer::NovaSeq6000)
    }
}

/// All sequencers a format can be built for, in declaration order
pub fn get_supported_sequencers(sheet_format: SampleSheetFormat) -> Vec<Sequencer> {
    Sequencer::iter()
        .filter(|&sequencer| is_sequencer_supported(sheet_format, sequencer))
        .collect()
}

/// Splits the LIMS samples into those with a dual index and those without, preserving order.
/// Every dropped sample is logged.
pub fn remove_unwanted_samples(samples: Vec<LimsSample>) -> (Vec<LimsSample>, Vec<LimsSample>) {
    let (kept, dropped): (Vec<LimsSample>, Vec<LimsSample>) = samples.into_iter()
        .partition(|sample| sample.is_dual_index());
    for sample in dropped.iter() {
        warn!("Removing sample {} in lane {}, it does not have a dual index: {:?}", sample.sample_id, sample.lane, sample.index);
    }
    (kept, dropped)
}

/// Builds a sample sheet for a single flow cell; each instance performs one construction pass
pub struct SampleSheetCreator<'a> {
    /// The flow cell and its run parameters
    flow_cell: &'a FlowCell,
    /// Samples as delivered from the LIMS
    lims_samples: &'a [LimsSample],
    /// The format being built
    sheet_format: SampleSheetFormat,
    /// i5 handling for this run
    index_settings: IndexSettings,
    /// Optional catalogue to translate index ids into sequences
    index_repository: Option<&'a IndexRepository>,
    /// if true, skip the validation of the result
    force: bool
}

impl<'a> SampleSheetCreator<'a> {
    /// Sets up a creator, checking that the requested format fits the flow cell.
    /// # Arguments
    /// * `flow_cell` - the flow cell we are building a sheet for
    /// * `lims_samples` - all samples on the flow cell
    /// * `config` - the format and validation options
    /// # Errors
    /// * if a BCLConvert sheet is requested for a bcl2fastq flow cell
    /// * if the sequencer is not supported for the format
    /// * if there are no LIMS samples
    /// * if the index settings cannot be determined from the run parameters
    pub fn new(flow_cell: &'a FlowCell, lims_samples: &'a [LimsSample], config: CreatorConfig) -> Result<Self, SampleSheetError> {
        let bcl_converter = flow_cell.bcl_converter();
        let sheet_format = config.sheet_format().unwrap_or(SampleSheetFormat::from(bcl_converter));
        if sheet_format == SampleSheetFormat::BclConvert && bcl_converter == BclConverter::Bcl2fastq {
            return Err(SampleSheetError::IncompatibleConverter { sheet_format, bcl_converter });
        }

        let sequencer = flow_cell.run_parameters().sequencer();
        if !is_sequencer_supported(sheet_format, sequencer) {
            let supported = get_supported_sequencers(sheet_format).iter().map(|s| s.to_string()).join(", ");
            return Err(SampleSheetError::UnsupportedSequencer { sheet_format, sequencer, supported });
        }

        if lims_samples.is_empty() {
            return Err(SampleSheetError::NoLimsSamples { flow_cell: flow_cell.name().to_string() });
        }

        let index_settings = get_index_settings(flow_cell.run_parameters())?;
        Ok(Self {
            flow_cell,
            lims_samples,
            sheet_format,
            index_settings,
            index_repository: None,
            force: config.force()
        })
    }

    /// Adds an index catalogue used to translate LIMS index ids into sequences
    pub fn with_index_repository(mut self, index_repository: &'a IndexRepository) -> Self {
        self.index_repository = Some(index_repository);
        self
    }

    pub fn sheet_format(&self) -> SampleSheetFormat {
        self.sheet_format
    }

    pub fn index_settings(&self) -> IndexSettings {
        self.index_settings
    }

    /// Runs the full construction: filter, adapt indexes, derive per lane, assemble, and validate unless forced.
    /// # Errors
    /// * if an index contains invalid bases or is longer than its index read
    /// * if the assembled sheet does not pass validation
    pub fn construct_sample_sheet(&self) -> Result<ConstructedSampleSheet, SampleSheetError> {
        info!("Constructing {} sample sheet for {}", self.sheet_format, self.flow_cell.name());
        let resolved = self.resolve_indexes();
        let (kept_samples, dropped_samples) = remove_unwanted_samples(resolved);

        let indexed_samples: Vec<IndexedSample> = kept_samples.iter()
            .map(|sample| self.adapt_indexes(sample))
            .collect::<Result<_, _>>()?;

        let samples = match self.sheet_format {
            SampleSheetFormat::Bcl2Fastq => indexed_samples.iter()
                .map(FlowCellSample::new_bcl2fastq)
                .collect(),
            SampleSheetFormat::BclConvert => self.process_lanes(&indexed_samples)?
        };

        let mut content = match self.sheet_format {
            SampleSheetFormat::Bcl2Fastq => self.get_bcl2fastq_sections(),
            SampleSheetFormat::BclConvert => self.get_bcl_convert_sections()
        };
        content.push(vec![self.sheet_format.data_marker().to_string()]);
        content.push(self.sheet_format.column_names().iter().map(|column| column.to_string()).collect());
        content.extend(samples.iter().map(|sample| sample.to_row()));

        if self.force {
            warn!("Skipping validation of the sample sheet for {}", self.flow_cell.name());
        } else {
            let mut validator = SampleSheetValidator::for_format(&content, self.sheet_format);
            validator.validate()?;
        }

        info!("Sample sheet for {} contains {} samples, {} dropped", self.flow_cell.name(), samples.len(), dropped_samples.len());
        Ok(ConstructedSampleSheet {
            content,
            num_samples: samples.len(),
            dropped_samples
        })
    }

    /// Replaces catalogue ids with sequences if we have a catalogue
    fn resolve_indexes(&self) -> Vec<LimsSample> {
        self.lims_samples.iter()
            .map(|sample| {
                let mut resolved = sample.clone();
                if let Some(repository) = self.index_repository {
                    resolved.index = repository.resolve(&sample.index).to_string();
                }
                resolved
            })
            .collect()
    }

    /// Splits the LIMS index and applies i5 orientation and padding for this run
    fn adapt_indexes<'s>(&self, sample: &'s LimsSample) -> Result<IndexedSample<'s>, SampleSheetError> {
        let run_parameters = self.flow_cell.run_parameters();
        let (mut index1, mut index2) = get_index_pair(&sample.index, sample.index2.as_deref());

        if run_parameters.is_single_index() {
            index2 = String::new();
        } else if self.index_settings.should_i5_be_reverse_complemented() {
            index2 = get_reverse_complement(&index2)?;
        }

        if self.sheet_format == SampleSheetFormat::Bcl2Fastq {
            if is_padding_needed(run_parameters.get_index_1_cycles(), index1.len()) {
                index1 = pad_index_one(&index1);
            }
            if !index2.is_empty() && is_padding_needed(run_parameters.get_index_2_cycles(), index2.len()) {
                index2 = pad_index_two(&index2, self.index_settings.should_i5_be_reverse_complemented());
            }
        }
        debug!("Sample {} uses indexes {index1:?} / {index2:?}", sample.sample_id);
        Ok(IndexedSample::new(sample, index1, index2))
    }

    /// Derives the BCLConvert attributes of every sample against its lane and combines them, in input order
    fn process_lanes(&self, samples: &[IndexedSample]) -> Result<Vec<FlowCellSample>, SampleSheetError> {
        let mut samples_by_lane: IndexMap<u32, Vec<&IndexedSample>> = IndexMap::new();
        for sample in samples.iter() {
            samples_by_lane.entry(sample.lane()).or_default().push(sample);
        }

        samples.iter()
            .map(|sample| {
                let lane_samples = &samples_by_lane[&sample.lane()];
                let derived = self.derive_attributes(sample, lane_samples)?;
                Ok(FlowCellSample::new_bcl_convert(sample, derived))
            })
            .collect()
    }

    fn derive_attributes(&self, sample: &IndexedSample, lane_samples: &[&IndexedSample]) -> Result<DerivedAttributes, SampleSheetError> {
        let run_parameters = self.flow_cell.run_parameters();
        let override_cycles = get_override_cycles(
            run_parameters.get_read_1_cycles(), run_parameters.get_read_2_cycles(),
            run_parameters.get_index_1_cycles(), run_parameters.get_index_2_cycles(),
            sample.index().len(), sample.index2().len(),
            self.index_settings.are_i5_override_cycles_reverse_complemented()
        )?;

        Ok(DerivedAttributes {
            override_cycles,
            barcode_mismatches_1: get_barcode_mismatches_1(sample, lane_samples),
            barcode_mismatches_2: get_barcode_mismatches_2(
                sample, lane_samples,
                self.index_settings.are_i5_override_cycles_reverse_complemented(),
                run_parameters.is_single_index()
            )
        })
    }

    fn get_bcl_convert_sections(&self) -> Vec<Vec<String>> {
        let run_parameters = self.flow_cell.run_parameters();
        // support was checked at construction, so the platform is always known here
        let platform = get_instrument_platform(run_parameters.sequencer()).unwrap_or_default();
        let mut sections = vec![
            row(&[HEADER]),
            row(&[FILE_FORMAT_VERSION, FILE_FORMAT_VERSION_VALUE]),
            row(&[RUN_NAME, self.flow_cell.name().full_name()]),
            row(&[INSTRUMENT_PLATFORM, platform]),
            row(&[INDEX_ORIENTATION, INDEX_ORIENTATION_FORWARD]),
            row(&[INDEX_SETTINGS, self.index_settings.name()]),
            row(&[READS]),
            vec![READ_1_CYCLES.to_string(), run_parameters.get_read_1_cycles().to_string()],
            vec![READ_2_CYCLES.to_string(), run_parameters.get_read_2_cycles().to_string()],
            vec![INDEX_1_CYCLES.to_string(), run_parameters.get_index_1_cycles().to_string()],
        ];
        if !run_parameters.is_single_index() {
            sections.push(vec![INDEX_2_CYCLES.to_string(), run_parameters.get_index_2_cycles().to_string()]);
        }
        sections.extend([
            row(&[BCLCONVERT_SETTINGS]),
            row(&[SOFTWARE_VERSION, BCLCONVERT_SOFTWARE_VERSION]),
            row(&[FASTQ_COMPRESSION_FORMAT, FASTQ_COMPRESSION_FORMAT_VALUE]),
        ]);
        sections
    }

    fn get_bcl2fastq_sections(&self) -> Vec<Vec<String>> {
        vec![
            row(&[BCL2FASTQ_SETTINGS]),
            row(&[BARCODE_MISMATCHES_INDEX_1, "0"]),
            row(&[BARCODE_MISMATCHES_INDEX_2, "0"]),
        ]
    }
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

/// 0 if another sample in the lane has an i7 within the minimum Hamming distance, 1 otherwise.
/// Samples without an i7 keep the default, and neighbours without an i7 are never close.
pub fn get_barcode_mismatches_1(sample: &IndexedSample, lane_samples: &[&IndexedSample]) -> u8 {
    if sample.index().is_empty() {
        return DEFAULT_BARCODE_MISMATCHES;
    }
    let is_close = lane_samples.iter()
        .filter(|other| other.sample_id() != sample.sample_id() && !other.index().is_empty())
        .any(|other| get_hamming_distance_index_1(sample.index(), other.index()) < MINIMUM_HAMMING_DISTANCE);
    if is_close { 0 } else { DEFAULT_BARCODE_MISMATCHES }
}

/// 0 if another sample in the lane has an i5 within the minimum Hamming distance, 1 otherwise.
/// Single-index runs keep the default and samples without an i5 get "na".
/// Neighbours without an i5 are never close.
/// # Arguments
/// * `sample` - the sample being scored
/// * `lane_samples` - everything in the same lane, the sample itself included
/// * `is_reverse_complement` - if true, i5 sequences are compared by their ends
/// * `is_run_single_index` - true if the run has no i5 read
pub fn get_barcode_mismatches_2(
    sample: &IndexedSample, lane_samples: &[&IndexedSample], is_reverse_complement: bool, is_run_single_index: bool
) -> BarcodeMismatches2 {
    if is_run_single_index {
        return BarcodeMismatches2::default();
    }
    if sample.index2().is_empty() {
        return BarcodeMismatches2::NotApplicable;
    }
    let is_close = lane_samples.iter()
        .filter(|other| other.sample_id() != sample.sample_id() && !other.index2().is_empty())
        .any(|other| get_hamming_distance_index_2(sample.index2(), other.index2(), is_reverse_complement) < MINIMUM_HAMMING_DISTANCE);
    if is_close { BarcodeMismatches2::Count(0) } else { BarcodeMismatches2::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::flow_cell::FlowCellName;
    use crate::data_types::run_parameters::RunParameters;
    use crate::data_types::sample_sheet::SampleSheet;
    use crate::data_types::samples::BclConvertSample;
    use pretty_assertions::assert_eq;

    fn lims(lane: u32, sample_id: &str, index: &str) -> LimsSample {
        LimsSample {
            flowcell_id: "HK33MDRXY".to_string(),
            lane,
            sample_id: sample_id.to_string(),
            index: index.to_string(),
            index2: None,
            sample_name: format!("name_{sample_id}"),
            project: "504910".to_string()
        }
    }

    fn flow_cell(sequencer: Sequencer, cycles: (u32, u32, u32, u32), bcl_converter: BclConverter) -> FlowCell {
        let name: FlowCellName = "230912_A00187_1009_AHK33MDRXY".parse().unwrap();
        let run_parameters = RunParameters::new(sequencer, "1.7.0", "1.5", cycles);
        FlowCell::new(name, run_parameters, bcl_converter)
    }

    fn bcl_convert_samples(sheet: &ConstructedSampleSheet) -> Vec<BclConvertSample> {
        SampleSheet::from_content(sheet.content()).unwrap()
            .samples().iter()
            .map(|sample| match sample {
                FlowCellSample::BclConvert(s) => s.clone(),
                FlowCellSample::Bcl2Fastq(_) => panic!("wrong format")
            })
            .collect()
    }

    #[test]
    fn test_sequencer_support() {
        assert_eq!(get_supported_sequencers(SampleSheetFormat::BclConvert), vec![Sequencer::NovaSeq6000, Sequencer::NovaSeqX]);
        assert_eq!(get_supported_sequencers(SampleSheetFormat::Bcl2Fastq), vec![Sequencer::HiSeqX, Sequencer::NovaSeq6000]);
        assert_eq!(get_instrument_platform(Sequencer::NovaSeqX), Some("NovaSeqXSeries"));
    }

    #[test]
    fn test_remove_unwanted_samples() {
        let samples = vec![
            lims(1, "ACC1", "ATCACG-GGCTAC"),
            lims(1, "ACC2", "ATCACG"),
            lims(2, "ACC3", "TTAGGC-CAGATC"),
            lims(2, "ACC4", ""),
            LimsSample { index2: Some("CAGATC".to_string()), ..lims(3, "ACC5", "GGCTAC") },
        ];
        let (kept, dropped) = remove_unwanted_samples(samples.clone());
        assert_eq!(kept, vec![samples[0].clone(), samples[2].clone(), samples[4].clone()]);
        assert_eq!(dropped, vec![samples[1].clone(), samples[3].clone()]);
        // nothing is lost or duplicated
        assert_eq!(kept.len() + dropped.len(), samples.len());
    }

    #[test]
    fn test_close_indexes_get_zero_mismatches() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 6, 6), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1", "ATCACG-GGCTAC"),
            lims(1, "ACC2", "ATCATG-TTAGGC"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].barcode_mismatches_1, 0);
        assert_eq!(parsed[1].barcode_mismatches_1, 0);
        assert_eq!(parsed[0].barcode_mismatches_2, BarcodeMismatches2::Count(1));
        assert_eq!(parsed[1].barcode_mismatches_2, BarcodeMismatches2::Count(1));
    }

    #[test]
    fn test_distant_indexes_keep_default_mismatches() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 6, 6), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1", "ATCACG-GGCTAC"),
            lims(1, "ACC2", "GGGGGG-GGCTAA"),
            // same i7 as ACC1 but a different lane
            lims(2, "ACC3", "ATCACG-CAGATC"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].barcode_mismatches_1, 1);
        assert_eq!(parsed[1].barcode_mismatches_1, 1);
        assert_eq!(parsed[2].barcode_mismatches_1, 1);
        // the i5s of ACC1 and ACC2 are one apart
        assert_eq!(parsed[0].barcode_mismatches_2, BarcodeMismatches2::Count(0));
        assert_eq!(parsed[1].barcode_mismatches_2, BarcodeMismatches2::Count(0));
        assert_eq!(parsed[2].barcode_mismatches_2, BarcodeMismatches2::Count(1));
    }

    #[test]
    fn test_empty_neighbour_indexes_are_not_close() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 8, 8), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1", "ATCACGTT-"),
            lims(1, "ACC2", "GGCTACAG-TTAGGCAT"),
            lims(1, "ACC3", "CAGATCTG-GCACTGAA"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].index2, "");
        assert_eq!(parsed[0].barcode_mismatches_2, BarcodeMismatches2::NotApplicable);
        assert_eq!(parsed[1].barcode_mismatches_2, BarcodeMismatches2::Count(1));
        assert_eq!(parsed[2].barcode_mismatches_2, BarcodeMismatches2::Count(1));
        for sample in parsed.iter() {
            assert_eq!(sample.barcode_mismatches_1, 1);
        }
    }

    #[test]
    fn test_barcode_mismatches_1() {
        let records = vec![
            lims(1, "ACC1", ""),
            lims(1, "ACC2", ""),
            lims(1, "ACC3", ""),
        ];
        let a = IndexedSample::new(&records[0], "ATCACGTT".to_string(), String::new());
        let b = IndexedSample::new(&records[1], String::new(), String::new());
        let c = IndexedSample::new(&records[2], "ATCACG".to_string(), String::new());

        // an absent i7 is never close
        assert_eq!(get_barcode_mismatches_1(&a, &[&a, &b]), 1);
        assert_eq!(get_barcode_mismatches_1(&b, &[&a, &b]), 1);
        // shared prefix is identical
        assert_eq!(get_barcode_mismatches_1(&a, &[&a, &b, &c]), 0);
    }

    #[test]
    fn test_barcode_mismatches_2() {
        let records = vec![
            lims(1, "ACC1", ""),
            lims(1, "ACC2", ""),
            lims(1, "ACC3", ""),
        ];
        let short = IndexedSample::new(&records[0], "ATCACGTT".to_string(), "GCACTGAA".to_string());
        let long = IndexedSample::new(&records[1], "GGCTACAG".to_string(), "TTGCACTGAA".to_string());
        let missing = IndexedSample::new(&records[2], "CAGATCTG".to_string(), String::new());
        let lane = [&short, &long, &missing];

        // no i5 on a dual-index run
        assert_eq!(get_barcode_mismatches_2(&missing, &lane, true, false), BarcodeMismatches2::NotApplicable);
        assert_eq!(get_barcode_mismatches_2(&missing, &lane, false, false), BarcodeMismatches2::NotApplicable);

        // aligned at the end, the shorter i5 is the suffix of the longer one
        assert_eq!(get_barcode_mismatches_2(&short, &lane, true, false), BarcodeMismatches2::Count(0));
        assert_eq!(get_barcode_mismatches_2(&long, &lane, true, false), BarcodeMismatches2::Count(0));

        // aligned at the start, the prefixes are 7 apart
        assert_eq!(get_barcode_mismatches_2(&short, &lane, false, false), BarcodeMismatches2::Count(1));
        assert_eq!(get_barcode_mismatches_2(&long, &lane, false, false), BarcodeMismatches2::Count(1));

        // single-index runs keep the default whatever the i5s look like
        assert_eq!(get_barcode_mismatches_2(&short, &lane, true, true), BarcodeMismatches2::default());
        assert_eq!(get_barcode_mismatches_2(&missing, &lane, true, true), BarcodeMismatches2::Count(1));
    }

    #[test]
    fn test_override_cycles_in_sheet() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 8, 8), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1", "ATCACGTT-GCACTGAA"),
            lims(1, "ACC2", "CGATGT-TTAGGCAT"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].override_cycles, "Y151;I8;I8;Y151");
        assert_eq!(parsed[1].override_cycles, "Y151;I6N2;I8;Y151");
    }

    #[test]
    fn test_single_index_run() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 8, 0), BclConverter::BclConvert);
        let samples = vec![lims(1, "ACC1", "ATCACGTT-GCACTGAA")];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let sheet = creator.construct_sample_sheet().unwrap();
        assert!(!sheet.content().iter().any(|row| row[0] == INDEX_2_CYCLES));
        let parsed = bcl_convert_samples(&sheet);
        assert_eq!(parsed[0].override_cycles, "Y151;I8;Y151");
        assert_eq!(parsed[0].index2, "");
        assert_eq!(parsed[0].barcode_mismatches_2, BarcodeMismatches2::Count(1));
    }

    #[test]
    fn test_reverse_complement_novaseq_6000() {
        let flow_cell = flow_cell(Sequencer::NovaSeq6000, (151, 151, 10, 10), BclConverter::BclConvert);
        let samples = vec![lims(1, "ACC1", "ATCACGTT-GCACTGAA")];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        assert_eq!(creator.index_settings().name(), "NovaSeq6000Post1.5Kits");
        let sheet = creator.construct_sample_sheet().unwrap();
        let parsed = bcl_convert_samples(&sheet);
        assert_eq!(parsed[0].index2, "TTCAGTGC");
        // forward fill order for this preset
        assert_eq!(parsed[0].override_cycles, "Y151;I8N2;I8N2;Y151");
        assert!(sheet.content().contains(&vec![INSTRUMENT_PLATFORM.to_string(), "NovaSeq6000".to_string()]));
    }

    #[test]
    fn test_novaseq_x_fill_order() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 10, 10), BclConverter::BclConvert);
        let samples = vec![lims(1, "ACC1", "ATCACGTT-GCACTGAA")];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].index2, "GCACTGAA");
        assert_eq!(parsed[0].override_cycles, "Y151;I8N2;N2I8;Y151");
    }

    #[test]
    fn test_bcl2fastq_sheet_with_padding() {
        let flow_cell = flow_cell(Sequencer::NovaSeq6000, (151, 151, 10, 10), BclConverter::Bcl2fastq);
        let samples = vec![
            lims(1, "ACC1", "ATCACGTT-GCACTGAA"),
            lims(2, "ACC2", "GAACTGAGCG-TCGTGGAGCG"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        assert_eq!(creator.sheet_format(), SampleSheetFormat::Bcl2Fastq);
        let sheet = creator.construct_sample_sheet().unwrap();
        assert_eq!(sheet.content()[0], vec!["[Settings]".to_string()]);

        let parsed = SampleSheet::from_content(sheet.content()).unwrap();
        // i5 is reverse complemented, so the pad goes in front
        assert_eq!(parsed.samples()[0].index(), "ATCACGTTAT");
        assert_eq!(parsed.samples()[0].index2(), "ACTTCAGTGC");
        assert_eq!(parsed.samples()[1].index(), "GAACTGAGCG");
        assert_eq!(parsed.samples()[1].index2(), "CGCTCCACGA");
    }

    #[test]
    fn test_round_trip() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 10, 10), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1", "GAACTGAGCG-TCGTGGAGCG"),
            lims(2, "ACC2", "AGGTCAGATA-CTACAAGATA"),
            lims(1, "ACC3", "CGTCTCATAT-TATAGTAGCT"),
            lims(3, "ACC4", "ATCACGTT"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        let parsed = SampleSheet::from_content(creator.construct_sample_sheet().unwrap().content()).unwrap();

        let expected: Vec<(u32, String, String)> = samples.iter()
            .filter(|s| s.is_dual_index())
            .map(|s| (s.lane, s.sample_id.clone(), get_index_pair(&s.index, None).0))
            .collect();
        let observed: Vec<(u32, String, String)> = parsed.samples().iter()
            .map(|s| (s.lane(), s.sample_id().to_string(), s.index().to_string()))
            .collect();
        assert_eq!(observed, expected);
    }

    #[test]
    fn test_index_repository_resolution() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 10, 10), BclConverter::BclConvert);
        let repository = IndexRepository::from_pairs(vec![
            ("UDI0001".to_string(), "GAACTGAGCG-TCGTGGAGCG".to_string())
        ]);
        let samples = vec![lims(1, "ACC1", "UDI0001")];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap()
            .with_index_repository(&repository);
        let parsed = bcl_convert_samples(&creator.construct_sample_sheet().unwrap());
        assert_eq!(parsed[0].index, "GAACTGAGCG");
        assert_eq!(parsed[0].index2, "TCGTGGAGCG");
    }

    #[test]
    fn test_configuration_errors() {
        let samples = vec![lims(1, "ACC1", "ATCACGTT-GCACTGAA")];

        let bcl2fastq_flow_cell = flow_cell(Sequencer::NovaSeq6000, (151, 151, 10, 10), BclConverter::Bcl2fastq);
        let config = CreatorConfigBuilder::default()
            .sheet_format(Some(SampleSheetFormat::BclConvert))
            .build().unwrap();
        assert!(matches!(
            SampleSheetCreator::new(&bcl2fastq_flow_cell, &samples, config),
            Err(SampleSheetError::IncompatibleConverter { .. })
        ));

        let hiseq_flow_cell = flow_cell(Sequencer::HiSeqX, (151, 151, 8, 8), BclConverter::BclConvert);
        match SampleSheetCreator::new(&hiseq_flow_cell, &samples, CreatorConfig::default()) {
            Err(SampleSheetError::UnsupportedSequencer { supported, .. }) => assert_eq!(supported, "NovaSeq6000, NovaSeqX"),
            _ => panic!("expected an unsupported sequencer error")
        };

        let novaseq_flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 10, 10), BclConverter::BclConvert);
        assert!(matches!(
            SampleSheetCreator::new(&novaseq_flow_cell, &[], CreatorConfig::default()),
            Err(SampleSheetError::NoLimsSamples { .. })
        ));
    }

    #[test]
    fn test_validation_and_force() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 10, 10), BclConverter::BclConvert);
        let samples = vec![
            lims(1, "ACC1_a", "GAACTGAGCG-TCGTGGAGCG"),
            lims(1, "ACC1_b", "AGGTCAGATA-CTACAAGATA"),
        ];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        assert!(matches!(
            creator.construct_sample_sheet(),
            Err(SampleSheetError::DuplicateSample { .. })
        ));

        let config = CreatorConfigBuilder::default().force(true).build().unwrap();
        let creator = SampleSheetCreator::new(&flow_cell, &samples, config).unwrap();
        let sheet = creator.construct_sample_sheet().unwrap();
        assert_eq!(sheet.content().len(), 18);
    }

    #[test]
    fn test_index_too_long() {
        let flow_cell = flow_cell(Sequencer::NovaSeqX, (151, 151, 8, 8), BclConverter::BclConvert);
        let samples = vec![lims(1, "ACC1", "GAACTGAGCG-TCGTGGAGCG")];
        let creator = SampleSheetCreator::new(&flow_cell, &samples, CreatorConfig::default()).unwrap();
        assert!(matches!(
            creator.construct_sample_sheet(),
            Err(SampleSheetError::IndexMath(_))
        ));
    }
}
