//! Server configuration types.
//!
//! Address and port bindings, worker threads, the routing path prefix,
//! and the lifecycle limits (header size, startup/shutdown timeouts).
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADDRESS, DEFAULT_MAX_HEADER_BYTES, DEFAULT_PORT, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
    DEFAULT_STARTUP_TIMEOUT_SECS, DEFAULT_THREADS,
};

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_threads() -> usize {
    DEFAULT_THREADS
}

fn default_max_header_bytes() -> usize {
    DEFAULT_MAX_HEADER_BYTES
}

fn default_startup_timeout() -> u64 {
    DEFAULT_STARTUP_TIMEOUT_SECS
}

fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of worker threads (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Prefix stripped from every request path before routing
    #[serde(default)]
    pub path_prefix: String,
    #[serde(default = "default_max_header_bytes")]
    pub max_header_bytes: usize,
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            threads: default_threads(),
            path_prefix: String::new(),
            max_header_bytes: default_max_header_bytes(),
            startup_timeout_secs: default_startup_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}
