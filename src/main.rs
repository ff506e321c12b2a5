use anyhow::Context;
use clap::Parser;

use scrollscape::{app::Session, cli::Cli};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    let cli = Cli::parse();
    let config = cli.scene_config().context("failed to load configuration")?;
    let session = Session {
        restore: cli.restore.clone(),
        save: cli.save.clone(),
    };

    scrollscape::app::run(config, session)?;
    Ok(())
}
