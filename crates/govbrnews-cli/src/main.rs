//! The `govbrnews` binary.

use anyhow::Result;
use clap::Parser;
use govbrnews_cli::{CliArgs, Command, GovBrNewsCli, config_handlers};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Config commands must work while the config file is missing or broken.
    if let Some(Command::Config(config_cmd)) = args.command {
        config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)?;
        return Ok(());
    }

    let cli = GovBrNewsCli::from_args(&args)?;
    cli.run(args).await?;
    Ok(())
}
