// Server module - HTTP server setup and configuration

pub mod handler;

use pingora::server::configuration::Opt as ServerOpt;

use crate::config::Config;
use crate::error::GatewayError;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0:8000")
    pub address: String,
    /// Number of worker threads
    pub threads: usize,
    /// Prefix stripped from request paths before routing
    pub path_prefix: String,
    /// Maximum request header size in bytes
    pub max_header_bytes: usize,
    pub startup_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Create a new ServerConfig with default values
    pub fn new(address: String) -> Self {
        Self {
            address,
            threads: crate::constants::DEFAULT_THREADS,
            path_prefix: String::new(),
            max_header_bytes: crate::constants::DEFAULT_MAX_HEADER_BYTES,
            startup_timeout_secs: crate::constants::DEFAULT_STARTUP_TIMEOUT_SECS,
            shutdown_timeout_secs: crate::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }

    /// Create ServerConfig from application Config
    pub fn from_config(config: &Config) -> Self {
        let address = format!("{}:{}", config.server.address, config.server.port);

        Self {
            address,
            threads: config.server.threads,
            path_prefix: config.server.path_prefix.clone(),
            max_header_bytes: config.server.max_header_bytes,
            startup_timeout_secs: config.server.startup_timeout_secs,
            shutdown_timeout_secs: config.server.shutdown_timeout_secs,
        }
    }
}

/// Tsubame HTTP server wrapper around the runtime server options.
pub struct TsubameServer {
    config: ServerConfig,
    server_opt: ServerOpt,
}

impl TsubameServer {
    /// Create a new TsubameServer instance
    pub fn new(config: ServerConfig) -> Result<Self, GatewayError> {
        let mut server_opt = ServerOpt::default();
        server_opt.upgrade = false; // No graceful binary upgrade
        server_opt.daemon = false; // Stay in the foreground
        server_opt.nocapture = false;
        server_opt.test = false;
        server_opt.conf = None; // Configuration comes from our own file

        Ok(Self { config, server_opt })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn server_opt(&self) -> &ServerOpt {
        &self.server_opt
    }
}
