use anyhow::{Context, Result};
use sensor_readout::cli::Cli;
use sensor_readout::config::{AppConfig, DEFAULT_CONFIG_PATH};
use sensor_readout::output::OutputKind;
use sensor_readout::{logging, service};
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // An explicit --config must exist; the default path is optional
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    let mut config = AppConfig::load(&config_path, required)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    config.apply_cli_overrides(&cli);
    config.validate()?;

    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    config.display.output = config.display.output.resolve();
    logging::init(&config.logging, config.display.output != OutputKind::Terminal)?;

    tracing::info!(
        sensor = %config.sensor.kind,
        mode = ?config.display.mode,
        output = ?config.display.output,
        "sensor-readout starting"
    );

    service::run(config).await?;
    Ok(())
}
