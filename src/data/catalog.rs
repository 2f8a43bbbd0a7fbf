use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::CatalogError;
use super::loader::{self, TextEncoding, SUPPORTED_EXTENSIONS};
use super::model::RawRecord;

/// Source of raw records, queried by (dataset name, split).
pub trait DatasetCatalog {
    /// Fetch every record of `split`, in the catalog's own order.
    fn load(&self, name: &str, split: &str) -> Result<Vec<RawRecord>, CatalogError>;
}

// ---------------------------------------------------------------------------
// FileCatalog – one file per split on local disk
// ---------------------------------------------------------------------------

/// Upstream file names of the Sentiment140 distribution. Their text is Latin-1.
const SENTIMENT140_FILES: [(&str, &str); 2] = [
    ("train", "training.1600000.processed.noemoticon.csv"),
    ("test", "testdata.manual.2009.06.14.csv"),
];

/// Directory-backed catalog laid out as `<root>/<name>/<split>.<ext>`.
///
/// Extensions are tried in [`SUPPORTED_EXTENSIONS`] order. The `sentiment140`
/// dataset also accepts the upstream flat-file names for `train` and `test`.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
}

impl FileCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing file backing `split`, if any.
    pub fn resolve(&self, name: &str, split: &str) -> Option<PathBuf> {
        let dir = self.root.join(name);

        let by_split = SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{split}.{ext}")));
        let upstream = SENTIMENT140_FILES
            .iter()
            .filter(|(s, _)| name == "sentiment140" && *s == split)
            .map(|(_, file)| dir.join(file));

        by_split.chain(upstream).find(|p| p.is_file())
    }

    fn encoding_of(path: &Path) -> TextEncoding {
        let upstream = path
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|f| SENTIMENT140_FILES.iter().any(|(_, file)| *file == f));
        if upstream {
            TextEncoding::Latin1
        } else {
            TextEncoding::Utf8
        }
    }
}

impl DatasetCatalog for FileCatalog {
    fn load(&self, name: &str, split: &str) -> Result<Vec<RawRecord>, CatalogError> {
        let path = self
            .resolve(name, split)
            .ok_or_else(|| CatalogError::UnknownSplit {
                name: name.to_string(),
                split: split.to_string(),
            })?;
        let encoding = Self::encoding_of(&path);
        log::debug!("{name}/{split}: reading {} ({encoding:?})", path.display());
        loader::load_file_with(&path, encoding)
    }
}

// ---------------------------------------------------------------------------
// InMemoryCatalog
// ---------------------------------------------------------------------------

/// Catalog holding splits in memory; `load` returns clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    splits: HashMap<(String, String), Vec<RawRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split(mut self, name: &str, split: &str, records: Vec<RawRecord>) -> Self {
        self.insert(name, split, records);
        self
    }

    pub fn insert(&mut self, name: &str, split: &str, records: Vec<RawRecord>) {
        self.splits
            .insert((name.to_string(), split.to_string()), records);
    }
}

impl DatasetCatalog for InMemoryCatalog {
    fn load(&self, name: &str, split: &str) -> Result<Vec<RawRecord>, CatalogError> {
        self.splits
            .get(&(name.to_string(), split.to_string()))
            .cloned()
            .ok_or_else(|| CatalogError::UnknownSplit {
                name: name.to_string(),
                split: split.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_catalog_prefers_parquet_then_csv() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("sentiment140");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("test.csv"), "polarity,text\n0,from csv\n").unwrap();
        std::fs::write(data.join("test.json"), r#"[{"text":"from json","polarity":4}]"#).unwrap();

        let catalog = FileCatalog::new(dir.path());
        assert_eq!(catalog.resolve("sentiment140", "test"), Some(data.join("test.csv")));
        assert_eq!(
            catalog.load("sentiment140", "test").unwrap(),
            vec![RawRecord::new("from csv", 0)]
        );
    }

    #[test]
    fn file_catalog_falls_back_to_upstream_names() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("sentiment140");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(
            data.join("testdata.manual.2009.06.14.csv"),
            "\"4\",\"3\",\"Mon May 11 03:17:40 UTC 2009\",\"kindle2\",\"tpryan\",\"love it\"\n",
        )
        .unwrap();

        let catalog = FileCatalog::new(dir.path());
        assert_eq!(
            catalog.load("sentiment140", "test").unwrap(),
            vec![RawRecord::new("love it", 4)]
        );
        assert!(catalog.resolve("other", "test").is_none());
    }

    #[test]
    fn upstream_files_are_read_as_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("sentiment140");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(
            data.join("training.1600000.processed.noemoticon.csv"),
            b"\"4\",\"1\",\"d\",\"NO_QUERY\",\"u\",\"caf\xe9\"\n",
        )
        .unwrap();
        std::fs::write(data.join("test.csv"), "polarity,text\n4,caf\u{e9}\n").unwrap();

        let catalog = FileCatalog::new(dir.path());
        let expected = vec![RawRecord::new("caf\u{e9}", 4)];
        assert_eq!(catalog.load("sentiment140", "train").unwrap(), expected);
        assert_eq!(catalog.load("sentiment140", "test").unwrap(), expected);
    }

    #[test]
    fn file_catalog_unknown_split() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path());
        assert!(matches!(
            catalog.load("sentiment140", "validation"),
            Err(CatalogError::UnknownSplit { .. })
        ));
    }

    #[test]
    fn in_memory_catalog_returns_copies() {
        let catalog = InMemoryCatalog::new().with_split("s", "test", vec![RawRecord::new("x", 0)]);
        assert_eq!(catalog.load("s", "test").unwrap(), catalog.load("s", "test").unwrap());
        assert!(catalog.load("s", "train").is_err());
    }
}
