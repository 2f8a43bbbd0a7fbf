use clap::Parser;

use sentiment140_demo::app;
use sentiment140_demo::config::{Cli, DemoConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DemoConfig::from(Cli::parse());
    app::run(config)
}
