use super::catalog::DatasetCatalog;
use super::error::DatasetError;
use super::filter::{normalize_indexed, PolarityPolicy};
use super::model::{Dataset, FieldSpec, NormalizedRecord, RawRecord, Schema, LABELS};

/// Catalog name of the dataset.
pub const DATASET_NAME: &str = "sentiment140";

/// Fetch a split and, if `sort` is set, stably sort it by raw polarity.
///
/// Catalog order is not meaningful; sorting recovers the order the records
/// have in the upstream flat files.
pub fn load_sorted(
    catalog: &dyn DatasetCatalog,
    name: &str,
    split: &str,
    sort: bool,
) -> Result<Vec<RawRecord>, DatasetError> {
    let records = load_indexed(catalog, name, split, sort)?;
    Ok(records.into_iter().map(|(_, r)| r).collect())
}

/// [`load_sorted`], keeping each record's catalog row alongside it.
fn load_indexed(
    catalog: &dyn DatasetCatalog,
    name: &str,
    split: &str,
    sort: bool,
) -> Result<Vec<(usize, RawRecord)>, DatasetError> {
    let mut records: Vec<(usize, RawRecord)> = catalog
        .load(name, split)
        .map_err(|e| DatasetError::from_catalog(name, split, e))?
        .into_iter()
        .enumerate()
        .collect();
    if sort {
        records.sort_by_key(|(_, r)| r.polarity);
    }
    Ok(records)
}

/// Knobs for [`Sentiment140Data::with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub sort: bool,
    pub policy: PolarityPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sort: true,
            policy: PolarityPolicy::default(),
        }
    }
}

/// Sentiment140 tweets with neutral examples removed and binary labels.
#[derive(Debug, Clone)]
pub struct Sentiment140Data {
    split: String,
    examples: Vec<NormalizedRecord>,
}

impl Sentiment140Data {
    pub fn new(catalog: &dyn DatasetCatalog, split: &str) -> Result<Self, DatasetError> {
        Self::with_options(catalog, split, LoadOptions::default())
    }

    pub fn with_options(
        catalog: &dyn DatasetCatalog,
        split: &str,
        options: LoadOptions,
    ) -> Result<Self, DatasetError> {
        let raw = load_indexed(catalog, DATASET_NAME, split, options.sort)?;
        let total = raw.len();
        let examples = normalize_indexed(raw, options.policy)?;
        log::info!(
            "{DATASET_NAME}/{split}: {} examples ({} neutral dropped)",
            examples.len(),
            total - examples.len()
        );
        Ok(Self {
            split: split.to_string(),
            examples,
        })
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    /// `{sentence: TextSegment, label: CategoryLabel(["0", "1"])}`
    pub fn schema() -> Schema {
        Schema::new()
            .with_field("sentence", FieldSpec::TextSegment)
            .with_field("label", FieldSpec::category_label(&LABELS))
    }
}

impl Dataset for Sentiment140Data {
    fn examples(&self) -> &[NormalizedRecord] {
        &self.examples
    }

    fn spec(&self) -> Schema {
        Self::schema()
    }

    fn description(&self) -> String {
        format!("Sentiment140 tweets ({} split), neutral removed", self.split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::InMemoryCatalog;
    use crate::data::error::CatalogError;

    fn catalog(records: Vec<RawRecord>) -> InMemoryCatalog {
        InMemoryCatalog::new().with_split(DATASET_NAME, "test", records)
    }

    fn record(sentence: &str, label: &str) -> NormalizedRecord {
        NormalizedRecord {
            sentence: sentence.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn end_to_end_example() {
        let catalog = catalog(vec![
            RawRecord::new("great!", 4),
            RawRecord::new("meh", 2),
            RawRecord::new("bad", 0),
        ]);
        let data = Sentiment140Data::new(&catalog, "test").unwrap();
        assert_eq!(data.examples(), &[record("bad", "0"), record("great!", "1")]);
    }

    #[test]
    fn sort_is_stable_on_equal_polarity() {
        let catalog = catalog(vec![
            RawRecord::new("p1", 4),
            RawRecord::new("n1", 0),
            RawRecord::new("p2", 4),
            RawRecord::new("x", 2),
            RawRecord::new("n2", 0),
            RawRecord::new("p3", 4),
        ]);
        let data = Sentiment140Data::new(&catalog, "test").unwrap();
        let sentences: Vec<&str> = data.examples().iter().map(|r| r.sentence.as_str()).collect();
        assert_eq!(sentences, ["n1", "n2", "p1", "p2", "p3"]);
    }

    #[test]
    fn sort_uses_raw_polarity_before_relabel() {
        // Code 1 and 0 both become label "0" but stay ordered by raw code.
        let catalog = catalog(vec![
            RawRecord::new("one", 1),
            RawRecord::new("four", 4),
            RawRecord::new("zero", 0),
        ]);
        let raw = load_sorted(&catalog, DATASET_NAME, "test", true).unwrap();
        let polarities: Vec<i64> = raw.iter().map(|r| r.polarity).collect();
        assert_eq!(polarities, [0, 1, 4]);

        let data = Sentiment140Data::new(&catalog, "test").unwrap();
        assert_eq!(
            data.examples(),
            &[record("zero", "0"), record("one", "0"), record("four", "1")]
        );
    }

    #[test]
    fn unsorted_keeps_catalog_order() {
        let catalog = catalog(vec![
            RawRecord::new("great!", 4),
            RawRecord::new("meh", 2),
            RawRecord::new("bad", 0),
        ]);
        let options = LoadOptions {
            sort: false,
            ..LoadOptions::default()
        };
        let data = Sentiment140Data::with_options(&catalog, "test", options).unwrap();
        assert_eq!(data.examples(), &[record("great!", "1"), record("bad", "0")]);
    }

    #[test]
    fn loading_twice_is_identical() {
        let catalog = catalog(vec![
            RawRecord::new("c", 4),
            RawRecord::new("a", 0),
            RawRecord::new("b", 4),
        ]);
        let first = Sentiment140Data::new(&catalog, "test").unwrap();
        let second = Sentiment140Data::new(&catalog, "test").unwrap();
        assert_eq!(first.examples(), second.examples());
        assert_eq!(first.examples(), first.examples());
    }

    #[test]
    fn schema_is_static() {
        let empty = Sentiment140Data::new(&catalog(vec![]), "test").unwrap();
        let full = Sentiment140Data::new(&catalog(vec![RawRecord::new("a", 4)]), "test").unwrap();
        assert_eq!(empty.spec(), full.spec());
        assert_eq!(empty.spec(), Sentiment140Data::schema());
        assert_eq!(
            Sentiment140Data::schema().get("label"),
            Some(&FieldSpec::CategoryLabel {
                vocab: vec!["0".to_string(), "1".to_string()]
            })
        );
        assert_eq!(Sentiment140Data::schema().get("sentence"), Some(&FieldSpec::TextSegment));
        assert_eq!(Sentiment140Data::schema().len(), 2);
    }

    #[test]
    fn unknown_split_is_data_unavailable() {
        let err = Sentiment140Data::new(&catalog(vec![]), "train").unwrap_err();
        match err {
            DatasetError::DataUnavailable { name, split, source } => {
                assert_eq!(name, DATASET_NAME);
                assert_eq!(split, "train");
                assert!(matches!(source, CatalogError::UnknownSplit { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_index_is_catalog_row_after_sorting() {
        let catalog = catalog(vec![
            RawRecord::new("p", 4),
            RawRecord::new(&b"caf\xe9"[..], 4),
            RawRecord::new("n", 0),
        ]);
        // Sorting moves the bad record to position 2; the error still names row 1.
        match Sentiment140Data::new(&catalog, "test") {
            Err(DatasetError::MalformedRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn strict_policy_propagates_malformed_record() {
        let catalog = catalog(vec![RawRecord::new("a", 0), RawRecord::new("b", 3)]);
        let options = LoadOptions {
            policy: PolarityPolicy::Strict,
            ..LoadOptions::default()
        };
        assert!(matches!(
            Sentiment140Data::with_options(&catalog, "test", options),
            Err(DatasetError::MalformedRecord { .. })
        ));
    }
}
