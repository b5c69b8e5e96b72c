/*!
# Index math
Pure functions on index sequences and cycle counts: dual-index detection, reverse complements,
Hamming distances with the index-specific truncation rules, override-cycles strings, and index padding.

## Example usage
```rust
use demuxsheet::index_math::{get_override_cycles, get_reverse_complement, get_hamming_distance_index_1};

assert_eq!(get_reverse_complement("ACCGT").unwrap(), "ACGGT");
// index 1 comparisons look at the shared prefix only
assert_eq!(get_hamming_distance_index_1("ATCACGTT", "ATCATG"), 1);
// an 8 bp i5 on a 10 cycle read is padded at the end in forward orientation
assert_eq!(get_override_cycles(151, 151, 10, 10, 10, 8, false).unwrap(), "Y151;I10;I8N2;Y151");
```
*/

/// Minimum pair-wise distance before we tolerate a barcode mismatch in a lane
pub const MINIMUM_HAMMING_DISTANCE: usize = 3;
/// Separator between the i7 and i5 parts of a combined LIMS index
pub const DUAL_INDEX_SEPARATOR: char = '-';
/// Appended to 8 bp index 1 sequences on 10 cycle runs
pub const INDEX_ONE_PAD_SEQUENCE: &str = "AT";
/// Added to 8 bp index 2 sequences on 10 cycle runs
pub const INDEX_TWO_PAD_SEQUENCE: &str = "AC";
const PADDED_INDEX_CYCLES: u32 = 10;
const PADDED_INDEX_LENGTH: usize = 8;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IndexMathError {
    #[error("invalid base {base:?} in sequence {sequence:?}")]
    InvalidBase { base: char, sequence: String },
    #[error("sequences must be the same length for a Hamming distance: {len1} != {len2}")]
    LengthMismatch { len1: usize, len2: usize },
    #[error("index{index_number} is {length} bp long but the run only has {cycles} cycles")]
    IndexLongerThanCycles { index_number: u8, length: usize, cycles: u32 }
}

/// Returns true if the index holds both i7 and i5, e.g. "ATCACGTT-GCACTGAA"
pub fn is_dual_index(index: &str) -> bool {
    index.contains(DUAL_INDEX_SEPARATOR)
}

/// Splits a LIMS index into the (index1, index2) pair.
/// Combined indices are split on the first separator; otherwise the separate `index2` is used.
/// Surrounding whitespace is trimmed from both parts.
/// # Arguments
/// * `index` - the LIMS index field, possibly "index1-index2"
/// * `index2` - the separate LIMS index2 field, if any
pub fn get_index_pair(index: &str, index2: Option<&str>) -> (String, String) {
    match index.split_once(DUAL_INDEX_SEPARATOR) {
        Some((index1, index2)) => (index1.trim().to_string(), index2.trim().to_string()),
        None => (index.trim().to_string(), index2.unwrap_or_default().trim().to_string())
    }
}

/// Returns the reverse complement of a DNA sequence. N is its own complement.
/// # Errors
/// * if the sequence contains anything outside of ACGTN (upper case)
pub fn get_reverse_complement(dna: &str) -> Result<String, IndexMathError> {
    dna.chars().rev()
        .map(|base| match base {
            'A' => Ok('T'),
            'C' => Ok('G'),
            'G' => Ok('C'),
            'T' => Ok('A'),
            'N' => Ok('N'),
            other => Err(IndexMathError::InvalidBase { base: other, sequence: dna.to_string() })
        })
        .collect()
}

/// Counts the positions where two equal-length sequences differ
/// # Errors
/// * if the sequences have different lengths
pub fn get_hamming_distance(sequence_1: &str, sequence_2: &str) -> Result<usize, IndexMathError> {
    if sequence_1.len() != sequence_2.len() {
        return Err(IndexMathError::LengthMismatch { len1: sequence_1.len(), len2: sequence_2.len() });
    }
    Ok(mismatches(sequence_1.as_bytes(), sequence_2.as_bytes()))
}

/// Hamming distance between two i7 sequences, comparing only the shared prefix when lengths differ
pub fn get_hamming_distance_index_1(sequence_1: &str, sequence_2: &str) -> usize {
    let shortest = sequence_1.len().min(sequence_2.len());
    mismatches(&sequence_1.as_bytes()[..shortest], &sequence_2.as_bytes()[..shortest])
}

/// Hamming distance between two i5 sequences when lengths differ.
/// In reverse-complement orientation the sequences are aligned at their ends, so the suffixes are compared.
/// # Arguments
/// * `sequence_1` - the first i5
/// * `sequence_2` - the second i5
/// * `is_reverse_complement` - true if the i5 cycles are read in reverse-complement orientation
pub fn get_hamming_distance_index_2(sequence_1: &str, sequence_2: &str, is_reverse_complement: bool) -> usize {
    let b1 = sequence_1.as_bytes();
    let b2 = sequence_2.as_bytes();
    let shortest = b1.len().min(b2.len());
    if is_reverse_complement {
        mismatches(&b1[b1.len()-shortest..], &b2[b2.len()-shortest..])
    } else {
        mismatches(&b1[..shortest], &b2[..shortest])
    }
}

fn mismatches(s1: &[u8], s2: &[u8]) -> usize {
    s1.iter().zip(s2.iter())
        .filter(|(c1, c2)| c1 != c2)
        .count()
}

/// Builds the per-sample override cycles string, e.g. "Y151;I8;I8;Y151".
/// Indices shorter than the configured cycles get the remaining cycles masked with N.
/// The index 2 term is dropped for single-index runs (`index_2_cycles == 0`).
/// # Arguments
/// * `read_1_cycles` - read 1 cycles of the run
/// * `read_2_cycles` - read 2 cycles of the run
/// * `index_1_cycles` - index 1 cycles of the run
/// * `index_2_cycles` - index 2 cycles of the run, 0 for single-index runs
/// * `sample_index_1_len` - length of the sample i7
/// * `sample_index_2_len` - length of the sample i5, 0 if missing
/// * `i5_reverse_complement_override` - if true, i5 padding is placed before the index bases
/// # Errors
/// * if a sample index is longer than its index read
#[allow(clippy::too_many_arguments)]
pub fn get_override_cycles(
    read_1_cycles: u32, read_2_cycles: u32, index_1_cycles: u32, index_2_cycles: u32,
    sample_index_1_len: usize, sample_index_2_len: usize,
    i5_reverse_complement_override: bool
) -> Result<String, IndexMathError> {
    let mut terms: Vec<String> = Vec::with_capacity(4);
    terms.push(format!("Y{read_1_cycles}"));

    // index 1 is always anchored at the start
    let pad_1 = padding(1, sample_index_1_len, index_1_cycles)?;
    if pad_1 == 0 {
        terms.push(format!("I{index_1_cycles}"));
    } else {
        terms.push(format!("I{sample_index_1_len}N{pad_1}"));
    }

    if index_2_cycles > 0 {
        let term = if sample_index_2_len == 0 {
            format!("N{index_2_cycles}")
        } else {
            let pad_2 = padding(2, sample_index_2_len, index_2_cycles)?;
            if pad_2 == 0 {
                format!("I{index_2_cycles}")
            } else if i5_reverse_complement_override {
                format!("N{pad_2}I{sample_index_2_len}")
            } else {
                format!("I{sample_index_2_len}N{pad_2}")
            }
        };
        terms.push(term);
    }

    terms.push(format!("Y{read_2_cycles}"));
    Ok(terms.join(";"))
}

fn padding(index_number: u8, length: usize, cycles: u32) -> Result<usize, IndexMathError> {
    (cycles as usize).checked_sub(length)
        .ok_or(IndexMathError::IndexLongerThanCycles { index_number, length, cycles })
}

/// Returns true if an index needs padding to fill the index read, only 8 bp indices on 10 cycle reads
pub fn is_padding_needed(index_cycles: u32, sample_index_length: usize) -> bool {
    index_cycles == PADDED_INDEX_CYCLES && sample_index_length == PADDED_INDEX_LENGTH
}

/// Pads an i7 by appending the fixed pad sequence
pub fn pad_index_one(index_1: &str) -> String {
    format!("{index_1}{INDEX_ONE_PAD_SEQUENCE}")
}

/// Pads an i5; when the i5 is written reverse complemented the pad goes in front
pub fn pad_index_two(index_2: &str, is_reverse_complement: bool) -> String {
    if is_reverse_complement {
        format!("{INDEX_TWO_PAD_SEQUENCE}{index_2}")
    } else {
        format!("{index_2}{INDEX_TWO_PAD_SEQUENCE}")
    }
}
