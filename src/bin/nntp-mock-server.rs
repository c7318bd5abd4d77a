use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nntp_mock::args::Args;
use nntp_mock::config::{CONFIG_FILE, Config, ConfigSource, active_env_overrides};
use nntp_mock::logging::init_logging;
use nntp_mock::runtime::{RuntimeConfig, shutdown_signal};
use nntp_mock::{NntpServer, load_config, load_config_with_fallback};

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) = match &args.config {
        Some(path) => (load_config(path.as_str())?, ConfigSource::File(path.as_str().into())),
        None => load_config_with_fallback(CONFIG_FILE)?,
    };
    args.apply_to(&mut config);
    config.validate()?;

    init_logging(config.logging.file.as_deref());
    info!("Loaded configuration from {}", source.description());
    for (key, value) in active_env_overrides(|key| std::env::var(key).ok()) {
        info!("Using {} from {}", value, key);
    }

    let rt = RuntimeConfig::from_args(config.server.threads).build_runtime()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let mut server = NntpServer::new(config.server.address.clone(), config.server.options());

    server.load_fixtures(&config.fixtures.path).with_context(|| {
        format!(
            "Failed to load fixtures from '{}'",
            config.fixtures.path.display()
        )
    })?;

    let listening = server.listen().await?;
    listening.serve(async {
        shutdown_signal().await;
        info!("Shutdown signal received");
    })
    .await
}
