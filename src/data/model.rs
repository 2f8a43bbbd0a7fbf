use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Polarity codes and the output label vocabulary
// ---------------------------------------------------------------------------

/// Raw catalog code for negative sentiment.
pub const POLARITY_NEGATIVE: i64 = 0;
/// Raw catalog code for neutral sentiment. Records with this code are dropped.
pub const POLARITY_NEUTRAL: i64 = 2;
/// Raw catalog code for positive sentiment.
pub const POLARITY_POSITIVE: i64 = 4;

/// Output label vocabulary; a label is the string at its vocabulary index.
pub const LABELS: [&str; 2] = ["0", "1"];

// ---------------------------------------------------------------------------
// RawRecord – one record as the catalog hands it over
// ---------------------------------------------------------------------------

/// A single record in the catalog's own label space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Tweet text, still encoded.
    pub text: Vec<u8>,
    /// Catalog polarity code (0, 2 or 4 for well-formed data).
    pub polarity: i64,
}

impl RawRecord {
    pub fn new(text: impl Into<Vec<u8>>, polarity: i64) -> Self {
        Self {
            text: text.into(),
            polarity,
        }
    }
}

// ---------------------------------------------------------------------------
// NormalizedRecord – one example served to the analysis tool
// ---------------------------------------------------------------------------

/// A decoded, relabelled example. `label` is always one of [`LABELS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub sentence: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Schema – field names and their semantic types
// ---------------------------------------------------------------------------

/// Semantic type of one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "__name__")]
pub enum FieldSpec {
    /// Free text.
    TextSegment,
    /// Categorical value constrained to `vocab`.
    CategoryLabel { vocab: Vec<String> },
    /// Class probabilities over `vocab`, scored against the `parent` label field.
    MulticlassPreds { vocab: Vec<String>, parent: String },
}

impl FieldSpec {
    pub fn category_label(vocab: &[&str]) -> Self {
        FieldSpec::CategoryLabel {
            vocab: vocab.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::TextSegment => write!(f, "TextSegment"),
            FieldSpec::CategoryLabel { vocab } => write!(f, "CategoryLabel({})", vocab.join(",")),
            FieldSpec::MulticlassPreds { vocab, parent } => {
                write!(f, "MulticlassPreds({}; parent={parent})", vocab.join(","))
            }
        }
    }
}

/// Ordered field name → [`FieldSpec`] description. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any previous field of the same name.
    pub fn with_field(mut self, name: &str, spec: FieldSpec) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self.fields.push((name.to_string(), spec));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, spec) in &self.fields {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Dataset – what the server consumes
// ---------------------------------------------------------------------------

/// A fully materialized list of examples plus the schema describing them.
pub trait Dataset: Send + Sync {
    /// All examples, in their final order. Repeated calls yield the same slice.
    fn examples(&self) -> &[NormalizedRecord];

    /// Static description of the example fields.
    fn spec(&self) -> Schema;

    fn description(&self) -> String {
        String::new()
    }

    fn len(&self) -> usize {
        self.examples().len()
    }

    fn is_empty(&self) -> bool {
        self.examples().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_serializes_in_field_order() {
        let schema = Schema::new()
            .with_field("sentence", FieldSpec::TextSegment)
            .with_field("label", FieldSpec::category_label(&LABELS));
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(
            json,
            r#"{"sentence":{"__name__":"TextSegment"},"label":{"__name__":"CategoryLabel","vocab":["0","1"]}}"#
        );
    }

    #[test]
    fn with_field_replaces_existing_name() {
        let schema = Schema::new()
            .with_field("label", FieldSpec::TextSegment)
            .with_field("label", FieldSpec::category_label(&LABELS));
        assert_eq!(schema.len(), 1);
        assert_eq!(
            schema.get("label"),
            Some(&FieldSpec::category_label(&LABELS))
        );
    }

    #[test]
    fn field_spec_display() {
        let preds = FieldSpec::MulticlassPreds {
            vocab: vec!["0".into(), "1".into()],
            parent: "label".into(),
        };
        assert_eq!(preds.to_string(), "MulticlassPreds(0,1; parent=label)");
        assert_eq!(FieldSpec::TextSegment.to_string(), "TextSegment");
    }
}
