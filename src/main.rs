use clap::Parser;
use colored::Colorize;
use openclaw_deploy::{cli::Cli, config, run, DeployError};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Ok(cwd) = std::env::current_dir() {
        config::load_env_file(&cwd);
    }

    match start(cli).await {
        Ok(()) => {}
        Err(DeployError::UserAborted(message)) => {
            eprintln!("{}", message.yellow());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn start(cli: Cli) -> openclaw_deploy::Result<()> {
    let mut config = config::load_config(cli.config.as_deref())?
        .with_env_overrides(|key| std::env::var(key).ok());
    if let Some(output) = cli.output.clone() {
        config.defaults.output_dir = Some(output);
    }
    config.validate()?;

    run(cli.mode(), &config).await
}
