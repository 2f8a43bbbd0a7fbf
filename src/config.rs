use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

use crate::data::filter::PolarityPolicy;
use crate::data::sentiment140::LoadOptions;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "sentiment140-demo",
    about = "Serve the Sentiment140 dataset next to a pretrained sentiment classifier",
    version
)]
pub struct Cli {
    /// Directory holding the fine-tuned model (config.json + weights)
    #[arg(long)]
    pub model_path: PathBuf,

    /// Root of the local dataset catalog (<data-dir>/sentiment140/<split>.csv)
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Dataset split to load
    #[arg(long, default_value = "test", value_parser = NonEmptyStringValueParser::new())]
    pub split: String,

    /// Keep catalog order instead of sorting by polarity
    #[arg(long)]
    pub no_sort: bool,

    /// Reject polarity codes other than 0, 2 and 4
    #[arg(long)]
    pub strict_labels: bool,

    /// Address to bind to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5432)]
    pub port: u16,

    /// Title reported to clients
    #[arg(long, default_value = "Sentiment140 Demo")]
    pub page_title: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Options recognized by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub page_title: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            page_title: "Sentiment140 Demo".to_string(),
        }
    }
}

impl ServerOptions {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything the startup sequence needs.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub model_path: PathBuf,
    pub data_dir: PathBuf,
    pub split: String,
    pub load: LoadOptions,
    pub server: ServerOptions,
}

impl From<Cli> for DemoConfig {
    fn from(cli: Cli) -> Self {
        let policy = if cli.strict_labels {
            PolarityPolicy::Strict
        } else {
            PolarityPolicy::Lenient
        };
        Self {
            model_path: cli.model_path,
            data_dir: cli.data_dir,
            split: cli.split,
            load: LoadOptions {
                sort: !cli.no_sort,
                policy,
            },
            server: ServerOptions {
                host: cli.host,
                port: cli.port,
                page_title: cli.page_title,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["sentiment140-demo", "--model-path", "/models/sst2"]).unwrap();
        let config = DemoConfig::from(cli);
        assert_eq!(config.model_path, PathBuf::from("/models/sst2"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.split, "test");
        assert_eq!(config.load, LoadOptions::default());
        assert_eq!(config.server, ServerOptions::default());
        assert_eq!(config.server.addr(), "localhost:5432");
    }

    #[test]
    fn flags_override() {
        let cli = Cli::try_parse_from([
            "sentiment140-demo",
            "--model-path",
            "m",
            "--split",
            "train",
            "--no-sort",
            "--strict-labels",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ])
        .unwrap();
        let config = DemoConfig::from(cli);
        assert_eq!(config.split, "train");
        assert!(!config.load.sort);
        assert_eq!(config.load.policy, PolarityPolicy::Strict);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn model_path_is_required() {
        assert!(Cli::try_parse_from(["sentiment140-demo"]).is_err());
    }

    #[test]
    fn split_must_be_non_empty() {
        assert!(Cli::try_parse_from(["sentiment140-demo", "--model-path", "m", "--split", ""]).is_err());
    }
}
