
use anyhow::{anyhow, Context};
use indexmap::IndexMap;
use log::{debug, warn};
use std::path::Path;

use crate::index_math::is_dual_index;

/// A catalogue entry mapping an index name to its sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Index {
    id: String,
    sequence: String
}

impl Index {
    /// Constructor
    pub fn new(id: String, sequence: String) -> Self {
        Self { id, sequence }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Returns true if the sequence holds both i7 and i5
    pub fn is_dual(&self) -> bool {
        is_dual_index(&self.sequence)
    }
}

/// The catalogue of valid indexes, in file order and unique by id
#[derive(Clone, Debug, Default)]
pub struct IndexRepository {
    indexes: IndexMap<String, Index>
}

impl IndexRepository {
    /// Builds a catalogue from (id, sequence) pairs; the first entry wins for a repeated id
    pub fn from_pairs<I: IntoIterator<Item=(String, String)>>(pairs: I) -> Self {
        let mut indexes: IndexMap<String, Index> = IndexMap::new();
        for (id, sequence) in pairs {
            if indexes.contains_key(&id) {
                warn!("Duplicate index id {id:?} in catalogue, keeping the first entry");
                continue;
            }
            indexes.insert(id.clone(), Index::new(id, sequence));
        }
        Self { indexes }
    }

    /// Loads a two column CSV (id, sequence).
    /// A first row reading "id,sequence" (any case) is treated as a header and skipped.
    /// # Arguments
    /// * `filename` - the catalogue CSV
    /// # Errors
    /// * if the file cannot be read
    /// * if a row is missing either column
    pub fn from_csv(filename: &Path) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false) // header row is optional, so we check for it ourselves
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(filename)
            .with_context(|| format!("Error while opening {filename:?}:"))?;

        let mut pairs = vec![];
        for (row_index, result) in csv_reader.records().enumerate() {
            let row = result.with_context(|| format!("Error while reading {filename:?}"))?;
            let id = row.get(0).ok_or(anyhow!("Missing index id on row: {row:?}"))?;
            let sequence = row.get(1).ok_or(anyhow!("Missing index sequence on row: {row:?}"))?;
            if row_index == 0 && id.eq_ignore_ascii_case("id") && sequence.eq_ignore_ascii_case("sequence") {
                continue;
            }
            pairs.push((id.to_string(), sequence.to_string()));
        }

        let repository = Self::from_pairs(pairs);
        debug!("Loaded {} indexes from {filename:?}", repository.len());
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Looks up a catalogue entry by id
    pub fn get(&self, id: &str) -> Option<&Index> {
        self.indexes.get(id)
    }

    /// All entries in catalogue order
    pub fn indexes(&self) -> impl Iterator<Item=&Index> {
        self.indexes.values()
    }

    /// Only the dual-index entries, in catalogue order
    pub fn dual_indexes(&self) -> Vec<&Index> {
        self.indexes.values()
            .filter(|index| index.is_dual())
            .collect()
    }

    /// Translates a LIMS index value into a sequence.
    /// Catalogue ids are replaced by their sequence, anything else is passed through as a literal sequence.
    pub fn resolve<'a>(&'a self, index: &'a str) -> &'a str {
        match self.indexes.get(index.trim()) {
            Some(entry) => entry.sequence(),
            None => index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_pairs() {
        let repository = IndexRepository::from_pairs(vec![
            ("A01".to_string(), "ATCACGTT-GCACTGAA".to_string()),
            ("B01".to_string(), "GGCTACAG".to_string()),
            ("A01".to_string(), "TTTTTTTT-AAAAAAAA".to_string()),
        ]);
        assert_eq!(repository.len(), 2);
        assert_eq!(repository.get("A01").unwrap().sequence(), "ATCACGTT-GCACTGAA");
        let dual_ids: Vec<&str> = repository.dual_indexes().into_iter().map(|i| i.id()).collect();
        assert_eq!(dual_ids, vec!["A01"]);
        assert_eq!(repository.resolve("A01"), "ATCACGTT-GCACTGAA");
        assert_eq!(repository.resolve("CCCCCCCC-GGGGGGGG"), "CCCCCCCC-GGGGGGGG");
    }

    #[test]
    fn test_from_csv() {
        let filename = PathBuf::from("test_data/index_catalogue.csv");
        let repository = IndexRepository::from_csv(&filename).unwrap();
        assert_eq!(repository.len(), 4);
        assert_eq!(repository.dual_indexes().len(), 3);
        let ids: Vec<&str> = repository.indexes().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["UDI0001", "UDI0002", "UDI0003", "SI0001"]);
        assert_eq!(repository.get("SI0001").unwrap().sequence(), "CGATGTTT");
    }
}
