//! HTTP source loader configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ACCEPT, DEFAULT_SCHEME, DEFAULT_USER_AGENT};

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpLoaderConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Scheme applied to schemeless source URLs; the literal `nil`
    /// disables the completion.
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Maximum source size in bytes; 0 means unlimited.
    #[serde(default)]
    pub max_allowed_size: usize,
    /// Skip TLS certificate verification towards source hosts.
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Client headers forwarded to source hosts; `*` forwards all.
    #[serde(default)]
    pub forward_headers: Vec<String>,
    /// Headers set unconditionally on source requests.
    #[serde(default)]
    pub override_headers: HashMap<String, String>,
    /// Glob patterns of hosts images may be loaded from; empty allows
    /// every host.
    #[serde(default)]
    pub allowed_sources: Vec<String>,
}

impl Default for HttpLoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            default_scheme: default_scheme(),
            accept: default_accept(),
            max_allowed_size: 0,
            insecure_skip_verify: false,
            proxy_url: None,
            forward_headers: Vec::new(),
            override_headers: HashMap::new(),
            allowed_sources: Vec::new(),
        }
    }
}
