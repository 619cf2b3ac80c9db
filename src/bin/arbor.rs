use anyhow::Result;
use arbor::config::ConfigLoader;
use arbor::logging::init_logging;
use arbor::tooling::cli::{write_default_config, Cli, CliContext, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load(cli.config.as_deref())?;
    init_logging(Some(&config.logging))?;

    // `init` must work before any store exists.
    if let Commands::Init { path } = &cli.command {
        print!("{}", write_default_config(path)?);
        return Ok(());
    }

    let mut context = CliContext::new(&config, cli.store.as_deref()).await?;
    let output = context.execute(&cli.command).await?;
    print!("{}", output);
    Ok(())
}
