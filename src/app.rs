use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::config::DemoConfig;
use crate::data::catalog::FileCatalog;
use crate::data::model::Dataset;
use crate::data::sentiment140::{Sentiment140Data, DATASET_NAME};
use crate::model::{Model, PretrainedSentimentModel};
use crate::server::Server;

// ---------------------------------------------------------------------------
// Startup sequence
// ---------------------------------------------------------------------------

/// Name the classifier is registered under.
pub const MODEL_NAME: &str = "sst";

/// Load the model and dataset described by `config` and wire them into a server.
pub fn build_server(config: &DemoConfig) -> Result<Server> {
    let model = PretrainedSentimentModel::from_path(&config.model_path)
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;

    let catalog = FileCatalog::new(&config.data_dir);
    let data = Sentiment140Data::with_options(&catalog, &config.split, config.load)
        .with_context(|| format!("loading {DATASET_NAME} split '{}'", config.split))?;

    let mut models: BTreeMap<String, Box<dyn Model>> = BTreeMap::new();
    models.insert(MODEL_NAME.to_string(), Box::new(model));

    let mut datasets: BTreeMap<String, Box<dyn Dataset>> = BTreeMap::new();
    datasets.insert(format!("{DATASET_NAME}_{}", config.split), Box::new(data));

    Ok(Server::new(models, datasets, config.server.clone()))
}

/// Build the server and block serving it.
pub fn run(config: DemoConfig) -> Result<()> {
    let server = build_server(&config)?;
    server.serve()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::ServerOptions;
    use crate::data::sentiment140::LoadOptions;

    fn config(model_path: &Path, data_dir: &Path, split: &str) -> DemoConfig {
        DemoConfig {
            model_path: model_path.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            split: split.to_string(),
            load: LoadOptions::default(),
            server: ServerOptions::default(),
        }
    }

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("model")).unwrap();
        let data = dir.path().join("data").join(DATASET_NAME);
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("test.csv"), "polarity,text\n4,great!\n2,meh\n0,bad\n").unwrap();
        dir
    }

    #[test]
    fn registers_model_and_split() {
        let dir = workspace();
        let config = config(&dir.path().join("model"), &dir.path().join("data"), "test");
        let server = build_server(&config).unwrap();
        assert_eq!(server.model_names().collect::<Vec<_>>(), [MODEL_NAME]);
        assert_eq!(server.dataset_names().collect::<Vec<_>>(), ["sentiment140_test"]);
    }

    #[test]
    fn missing_split_aborts_startup() {
        let dir = workspace();
        let config = config(&dir.path().join("model"), &dir.path().join("data"), "train");
        let err = build_server(&config).err().unwrap();
        assert!(format!("{err:#}").contains("split 'train'"));
    }

    #[test]
    fn missing_model_aborts_startup() {
        let dir = workspace();
        let config = config(&dir.path().join("nope"), &dir.path().join("data"), "test");
        assert!(build_server(&config).is_err());
    }
}
