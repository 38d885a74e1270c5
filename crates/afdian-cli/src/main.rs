/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Query results printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use afdian_client::AfdianClient;
use afdian_cli::{AppConfig, Command, execute};

#[derive(Parser, Debug)]
#[command(name = "afdian", version, about = "Afdian open API client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = "afdian.yaml")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(&args.config_path)?;
    info!(
        config_path = %args.config_path.display(),
        command = ?args.command,
        "configuration loaded"
    );

    let client = AfdianClient::with_config(config.credentials(), config.client_config())
        .context("create client")?;
    let value = execute(&client, &config.cache, &args.command).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    AppConfig::from_file(path_str).context("load config")
}
