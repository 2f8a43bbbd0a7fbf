use std::collections::BTreeSet;

use super::error::DatasetError;
use super::model::{
    NormalizedRecord, RawRecord, LABELS, POLARITY_NEGATIVE, POLARITY_NEUTRAL, POLARITY_POSITIVE,
};

// ---------------------------------------------------------------------------
// Polarity → label mapping
// ---------------------------------------------------------------------------

/// How to treat polarity codes outside {0, 2, 4}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolarityPolicy {
    /// Map any unexpected non-neutral code to label index 0.
    #[default]
    Lenient,
    /// Reject unexpected codes as malformed records.
    Strict,
}

/// Label index for a raw polarity code, or `None` if the record is dropped.
///
/// * neutral (2) → dropped
/// * positive (4) → 1
/// * negative (0) → 0
/// * anything else → 0 under [`PolarityPolicy::Lenient`], error under `Strict`
pub fn label_index(polarity: i64, policy: PolarityPolicy) -> Result<Option<usize>, String> {
    match polarity {
        POLARITY_NEUTRAL => Ok(None),
        POLARITY_POSITIVE => Ok(Some(1)),
        POLARITY_NEGATIVE => Ok(Some(0)),
        other => match policy {
            PolarityPolicy::Lenient => Ok(Some(0)),
            PolarityPolicy::Strict => Err(format!("unexpected polarity code {other}")),
        },
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Drop neutral records, relabel the rest and decode their text.
/// Input order is preserved; indices in errors refer to positions in `records`.
pub fn normalize(
    records: Vec<RawRecord>,
    policy: PolarityPolicy,
) -> Result<Vec<NormalizedRecord>, DatasetError> {
    normalize_indexed(records.into_iter().enumerate().collect(), policy)
}

/// Like [`normalize`], but each record carries its own index, reported in
/// `MalformedRecord` errors. Callers pass the catalog row so errors point at
/// the same record whether or not the split was reordered.
pub fn normalize_indexed(
    records: Vec<(usize, RawRecord)>,
    policy: PolarityPolicy,
) -> Result<Vec<NormalizedRecord>, DatasetError> {
    let mut warned: BTreeSet<i64> = BTreeSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (index, raw) in records {
        let label = label_index(raw.polarity, policy)
            .map_err(|reason| DatasetError::MalformedRecord { index, reason })?;
        let Some(label) = label else {
            continue;
        };

        if !matches!(raw.polarity, POLARITY_NEGATIVE | POLARITY_POSITIVE)
            && warned.insert(raw.polarity)
        {
            log::warn!(
                "record {index}: unexpected polarity code {}, labelling as '{}'",
                raw.polarity,
                LABELS[label]
            );
        }

        let sentence = String::from_utf8(raw.text).map_err(|e| DatasetError::MalformedRecord {
            index,
            reason: format!("text is not valid UTF-8: {e}"),
        })?;

        out.push(NormalizedRecord {
            sentence,
            label: LABELS[label].to_string(),
        });
    }

    Ok(out)
}
