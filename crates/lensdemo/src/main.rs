mod cli;
mod config;
mod paths;
mod run;

use std::path::Path;

use anyhow::{Context, Result};
use cli::{Command, ConfigAction};
use paths::resolve_config_file;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let explicit_config = cli.config.as_deref();
    match cli.command {
        Some(Command::Export(args)) => run::export(explicit_config, args),
        Some(Command::Config(config_cmd)) => {
            handle_config_command(explicit_config, config_cmd.action)
        }
        None => run::run(explicit_config, cli.run),
    }
}

fn handle_config_command(explicit_config: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = run::load_settings(explicit_config)?;
            let rendered = toml::to_string_pretty(&settings.to_file())
                .context("failed to serialize configuration to TOML")?;
            print!("{rendered}");
        }
        ConfigAction::Where => {
            let path = resolve_config_file(explicit_config)?;
            tracing::debug!(exists = path.exists(), "configuration file lookup");
            println!("{}", path.display());
        }
    }
    Ok(())
}
