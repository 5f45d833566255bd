//! HTTP source loader: option plumbing for fetching source images.
//!
//! The loader owns everything about *how* a source host is contacted:
//! the outgoing client, header forwarding and overriding, the host
//! allow-list, and the scheme completion for bare or router-collapsed
//! image URLs. The fetch itself is driven by the surrounding pipeline.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::HttpLoaderConfig;
use crate::constants::{DEFAULT_ACCEPT, DEFAULT_SCHEME, DEFAULT_USER_AGENT};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid proxy url {url}: {message}")]
    InvalidProxy { url: String, message: String },
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
}

/// Source loader configuration and client factory.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    pub user_agent: String,
    /// Scheme applied to schemeless images; the literal `nil` disables
    /// completion.
    pub default_scheme: String,
    pub accept: String,
    /// Maximum source size in bytes; 0 means unlimited.
    pub max_allowed_size: usize,
    pub insecure_skip_verify: bool,
    pub proxy_url: Option<String>,
    pub forward_headers: Vec<String>,
    pub override_headers: HashMap<String, String>,
    pub allowed_sources: Vec<String>,
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            max_allowed_size: 0,
            insecure_skip_verify: false,
            proxy_url: None,
            forward_headers: Vec::new(),
            override_headers: HashMap::new(),
            allowed_sources: Vec::new(),
        }
    }
}

impl HttpLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &HttpLoaderConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            default_scheme: config.default_scheme.clone(),
            accept: config.accept.clone(),
            max_allowed_size: config.max_allowed_size,
            insecure_skip_verify: config.insecure_skip_verify,
            proxy_url: config.proxy_url.clone(),
            forward_headers: config.forward_headers.clone(),
            override_headers: config.override_headers.clone(),
            allowed_sources: config.allowed_sources.clone(),
        }
    }

    // Consuming builder options; empty or zero values leave the default
    // in place.

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        if !user_agent.is_empty() {
            self.user_agent = user_agent;
        }
        self
    }

    pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
        let scheme = scheme.into();
        if !scheme.is_empty() {
            self.default_scheme = scheme;
        }
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        let accept = accept.into();
        if !accept.is_empty() {
            self.accept = accept;
        }
        self
    }

    pub fn with_max_allowed_size(mut self, max_allowed_size: usize) -> Self {
        if max_allowed_size > 0 {
            self.max_allowed_size = max_allowed_size;
        }
        self
    }

    pub fn with_insecure_skip_verify(mut self, enabled: bool) -> Self {
        self.insecure_skip_verify = enabled;
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        let proxy_url = proxy_url.into();
        if !proxy_url.is_empty() {
            self.proxy_url = Some(proxy_url);
        }
        self
    }

    /// Add headers to forward, given as one or more comma-separated
    /// lists. Blank entries are dropped.
    pub fn with_forward_headers(mut self, raw: &str) -> Self {
        for header in raw.split(',') {
            let header = header.trim();
            if !header.is_empty() {
                self.forward_headers.push(header.to_string());
            }
        }
        self
    }

    pub fn with_forward_all_headers(mut self, enabled: bool) -> Self {
        if enabled {
            self.forward_headers = vec!["*".to_string()];
        }
        self
    }

    pub fn with_override_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.override_headers.insert(name.into(), value.into());
        self
    }

    /// Add allowed source host patterns, given as one or more
    /// comma-separated lists.
    pub fn with_allowed_sources(mut self, raw: &str) -> Self {
        for host in raw.split(',') {
            let host = host.trim();
            if !host.is_empty() {
                self.allowed_sources.push(host.to_string());
            }
        }
        self
    }

    /// Whether an image may be loaded from `host`. An empty allow-list
    /// admits every host.
    pub fn allow_source(&self, host: &str) -> bool {
        if self.allowed_sources.is_empty() {
            return true;
        }
        self.allowed_sources
            .iter()
            .any(|pattern| glob_match(pattern, host))
    }

    /// Whether a client request header should be forwarded to the
    /// source host.
    pub fn should_forward_header(&self, name: &str) -> bool {
        self.forward_headers
            .iter()
            .any(|h| h == "*" || h.eq_ignore_ascii_case(name))
    }

    /// Complete the scheme of a parsed image identifier.
    ///
    /// Routers collapse the `//` of an embedded URL before the path
    /// reaches the parser, so `https:/host/a.png` is re-expanded here.
    /// Schemeless images get `default_scheme` unless it is `nil`.
    pub fn resolve_url(&self, image: &str) -> String {
        if image.starts_with("https://") || image.starts_with("http://") {
            return image.to_string();
        }
        if let Some(rest) = image.strip_prefix("https:/") {
            return format!("https://{}", rest);
        }
        if let Some(rest) = image.strip_prefix("http:/") {
            return format!("http://{}", rest);
        }
        if self.default_scheme == "nil" {
            return image.to_string();
        }
        format!("{}://{}", self.default_scheme, image)
    }

    /// Build the outgoing HTTP client this loader is configured for.
    pub fn client(&self) -> Result<reqwest::Client, LoaderError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());

        if self.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = &self.proxy_url {
            let proxy =
                reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| LoaderError::InvalidProxy {
                    url: proxy_url.clone(),
                    message: e.to_string(),
                })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| LoaderError::ClientBuild(e.to_string()))
    }
}

/// Simple glob pattern matching over host names.
///
/// Supports `*`/`**` (everything), `*suffix`, `prefix*`, and exact
/// match. Wildcards in the middle of a pattern are not supported.
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "**" || pattern == "*" {
        return true;
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return text.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return text.starts_with(prefix);
    }

    pattern == text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_defaults() {
        let loader = HttpLoader::new();
        assert_eq!(loader.default_scheme, DEFAULT_SCHEME);
        assert_eq!(loader.accept, DEFAULT_ACCEPT);
        assert!(loader.allow_source("anything.example.com"));
    }

    #[test]
    fn test_builder_ignores_empty_values() {
        let loader = HttpLoader::new()
            .with_user_agent("")
            .with_default_scheme("")
            .with_max_allowed_size(0);
        assert_eq!(loader.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(loader.default_scheme, DEFAULT_SCHEME);
        assert_eq!(loader.max_allowed_size, 0);
    }

    #[test]
    fn test_forward_headers_comma_splitting() {
        let loader = HttpLoader::new().with_forward_headers("Accept-Language, X-Trace , ,");
        assert_eq!(loader.forward_headers, vec!["Accept-Language", "X-Trace"]);
        assert!(loader.should_forward_header("accept-language"));
        assert!(!loader.should_forward_header("Cookie"));
    }

    #[test]
    fn test_forward_all_headers() {
        let loader = HttpLoader::new()
            .with_forward_headers("Accept-Language")
            .with_forward_all_headers(true);
        assert_eq!(loader.forward_headers, vec!["*"]);
        assert!(loader.should_forward_header("Cookie"));
    }

    #[test]
    fn test_allowed_sources() {
        let loader = HttpLoader::new().with_allowed_sources("*.example.com,cdn.other.org");
        assert!(loader.allow_source("img.example.com"));
        assert!(loader.allow_source("cdn.other.org"));
        assert!(!loader.allow_source("evil.com"));
    }

    #[test]
    fn test_resolve_url_restores_collapsed_scheme() {
        let loader = HttpLoader::new();
        assert_eq!(
            loader.resolve_url("https:/host/a.png"),
            "https://host/a.png"
        );
        assert_eq!(loader.resolve_url("http:/host/a.png"), "http://host/a.png");
    }

    #[test]
    fn test_resolve_url_keeps_intact_scheme() {
        let loader = HttpLoader::new();
        assert_eq!(
            loader.resolve_url("https://host/a.png"),
            "https://host/a.png"
        );
    }

    #[test]
    fn test_resolve_url_applies_default_scheme() {
        let loader = HttpLoader::new();
        assert_eq!(loader.resolve_url("host/a.png"), "https://host/a.png");

        let loader = HttpLoader::new().with_default_scheme("http");
        assert_eq!(loader.resolve_url("host/a.png"), "http://host/a.png");
    }

    #[test]
    fn test_resolve_url_nil_scheme_disables_completion() {
        let loader = HttpLoader::new().with_default_scheme("nil");
        assert_eq!(loader.resolve_url("host/a.png"), "host/a.png");
    }

    #[test]
    fn test_client_builds_with_options() {
        let loader = HttpLoader::new()
            .with_user_agent("test/1.0")
            .with_insecure_skip_verify(true);
        assert!(loader.client().is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_proxy() {
        let loader = HttpLoader::new().with_proxy("::not a url::");
        assert!(matches!(
            loader.client(),
            Err(LoaderError::InvalidProxy { .. })
        ));
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("**", "anything"));
        assert!(glob_match("*.example.com", "img.example.com"));
        assert!(glob_match("cdn.*", "cdn.example.com"));
        assert!(glob_match("exact.host", "exact.host"));
        assert!(!glob_match("*.example.com", "example.org"));
    }

    #[test]
    fn test_from_config() {
        let config = HttpLoaderConfig {
            user_agent: "cfg/1.0".to_string(),
            allowed_sources: vec!["*.example.com".to_string()],
            ..Default::default()
        };
        let loader = HttpLoader::from_config(&config);
        assert_eq!(loader.user_agent, "cfg/1.0");
        assert!(loader.allow_source("a.example.com"));
    }
}
