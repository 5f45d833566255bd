use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tsubame::config::Config;
use tsubame::loader::HttpLoader;

/// Tsubame Image Gateway - image transformation service
#[derive(Parser, Debug)]
#[command(name = "tsubame")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tsubame::logging::init_subscriber()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = Config::from_file(&args.config)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        unsafe_enabled = config.signing.allow_unsafe,
        "Configuration loaded successfully"
    );

    let loader = HttpLoader::from_config(&config.loader);
    loader
        .client()
        .map_err(|e| anyhow::anyhow!("Failed to build source client: {}", e))?;

    let server_config = tsubame::server::ServerConfig::from_config(&config);
    let server = tsubame::server::TsubameServer::new(server_config)
        .map_err(|e| anyhow::anyhow!("Failed to create server: {}", e))?;

    tracing::info!(
        address = %server.config().address,
        threads = server.config().threads,
        path_prefix = %server.config().path_prefix,
        "Starting Tsubame Image Gateway"
    );

    tracing::info!("Server initialized successfully");

    Ok(())
}
