use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::model::{FieldSpec, Schema, LABELS};

/// What the server needs to know about a model: its input and output specs.
pub trait Model: Send + Sync {
    fn input_spec(&self) -> Schema;

    fn output_spec(&self) -> Schema;

    fn description(&self) -> String {
        String::new()
    }

    /// A model can run on a dataset that provides every one of its inputs.
    fn is_compatible_with_dataset(&self, dataset_spec: &Schema) -> bool {
        self.input_spec()
            .fields()
            .all(|(name, _)| dataset_spec.contains(name))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model path {} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("Model archive {} must be extracted before use", .0.display())]
    ArchiveNotExtracted(PathBuf),
    #[error("Failed to read model config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Model has {found} labels, expected {expected}")]
    LabelMismatch { expected: usize, found: usize },
}

/// The subset of a Hugging Face `config.json` we look at.
#[derive(Debug, Default, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// A fine-tuned binary sentiment classifier stored on disk.
#[derive(Debug, Clone)]
pub struct PretrainedSentimentModel {
    path: PathBuf,
    model_type: Option<String>,
}

impl PretrainedSentimentModel {
    /// Open a model directory. `config.json`, when present, must describe a
    /// two-label classifier.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        if path.to_string_lossy().ends_with(".tar.gz") {
            return Err(ModelError::ArchiveNotExtracted(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(ModelError::NotADirectory(path.to_path_buf()));
        }

        let config_path = path.join("config.json");
        let config = if config_path.is_file() {
            let text = std::fs::read_to_string(&config_path).map_err(|e| ModelError::Config {
                path: config_path.clone(),
                source: e.into(),
            })?;
            serde_json::from_str::<ModelConfig>(&text).map_err(|e| ModelError::Config {
                path: config_path.clone(),
                source: e.into(),
            })?
        } else {
            log::warn!("{}: no config.json, assuming binary classifier", path.display());
            ModelConfig::default()
        };

        if !config.id2label.is_empty() && config.id2label.len() != LABELS.len() {
            return Err(ModelError::LabelMismatch {
                expected: LABELS.len(),
                found: config.id2label.len(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            model_type: config.model_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Model for PretrainedSentimentModel {
    fn input_spec(&self) -> Schema {
        Schema::new().with_field("sentence", FieldSpec::TextSegment)
    }

    fn output_spec(&self) -> Schema {
        Schema::new().with_field(
            "probas",
            FieldSpec::MulticlassPreds {
                vocab: LABELS.iter().map(|l| l.to_string()).collect(),
                parent: "label".to_string(),
            },
        )
    }

    fn description(&self) -> String {
        match &self.model_type {
            Some(t) => format!("{t} sentiment classifier at {}", self.path.display()),
            None => format!("sentiment classifier at {}", self.path.display()),
        }
    }
}
