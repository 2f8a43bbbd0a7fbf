use std::path::PathBuf;

/// Failures reported by a [`DatasetCatalog`](super::catalog::DatasetCatalog).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog has no data for this (dataset, split) pair.
    #[error("Unknown split '{split}' for dataset '{name}'")]
    UnknownSplit { name: String, split: String },
    /// A backing file could not be opened or parsed as a whole.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A single record is missing fields or carries unusable values.
    #[error("Malformed record at row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Failures while building a normalized dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The catalog could not supply the requested split.
    #[error("Dataset '{name}' split '{split}' is unavailable: {source}")]
    DataUnavailable {
        name: String,
        split: String,
        #[source]
        source: CatalogError,
    },
    /// A record could not be normalized. `index` is the record's row in the
    /// catalog split, before any sorting.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

impl DatasetError {
    /// Classify a catalog failure: per-record problems stay per-record,
    /// everything else means the split is unavailable.
    pub fn from_catalog(name: &str, split: &str, err: CatalogError) -> Self {
        match err {
            CatalogError::Malformed { row, reason } => DatasetError::MalformedRecord { index: row, reason },
            other => DatasetError::DataUnavailable {
                name: name.to_string(),
                split: split.to_string(),
                source: other,
            },
        }
    }
}
