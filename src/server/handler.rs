//! Routing decisions for the middleware chain ahead of the pipeline.
//!
//! These are pure functions over request metadata so the chain stays
//! testable without a live listener: the surrounding server maps each
//! decision onto an actual response.

use serde::Serialize;

use crate::error::GatewayError;

/// JSON error body for non-image responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrResp {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(rename = "status")]
    pub code: u16,
}

impl ErrResp {
    pub fn from_error(err: &GatewayError) -> Self {
        Self {
            message: err.to_string(),
            code: err.to_http_status(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// What to do with a request before the transformation pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Answer 200 with an empty body (healthcheck, favicon).
    Ok,
    /// Answer 308 with the query-stripped location.
    RedirectStripQuery(String),
    /// Hand the prefix-stripped path to the transformation pipeline.
    Pipeline(String),
}

/// Route a request.
///
/// Query strings are never part of the grammar; requests carrying one
/// are permanently redirected to the bare path so caches key on a single
/// spelling. The path prefix is stripped before the utility endpoints
/// are matched.
pub fn route(method: &str, path: &str, query: &str, path_prefix: &str) -> RouteDecision {
    if !query.is_empty() {
        return RouteDecision::RedirectStripQuery(path.to_string());
    }

    let path = if path_prefix.is_empty() {
        path
    } else {
        path.strip_prefix(path_prefix).unwrap_or(path)
    };

    if method == "GET" && (path == "/healthcheck" || path == "/favicon.ico") {
        return RouteDecision::Ok;
    }

    RouteDecision::Pipeline(path.to_string())
}
