// Error types module

use std::fmt;

/// Centralized error type for the gateway.
///
/// Categorizes failures into 4 main types for appropriate HTTP status
/// mapping:
/// - Config: configuration file/validation errors
/// - Signature: signature verification failures (missing, mismatched,
///   or unsafe requests while unsafe mode is off)
/// - Loader: source image loading errors with optional source context
/// - Internal: unexpected gateway errors with optional operation context
#[derive(Debug, Clone)]
pub enum GatewayError {
    Config {
        message: String,
        context: Option<String>,
    },
    Signature {
        message: String,
        path: Option<String>,
    },
    Loader {
        message: String,
        source: Option<String>,
    },
    Internal {
        message: String,
        operation: Option<String>,
    },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config { message, context } => {
                write!(f, "Configuration error: {}", message)?;
                if let Some(ctx) = context {
                    write!(f, " ({})", ctx)?;
                }
                Ok(())
            }
            GatewayError::Signature { message, path } => {
                write!(f, "Signature error: {}", message)?;
                if let Some(p) = path {
                    write!(f, " [path: {}]", p)?;
                }
                Ok(())
            }
            GatewayError::Loader { message, source } => {
                write!(f, "Loader error: {}", message)?;
                if let Some(s) = source {
                    write!(f, " [source: {}]", s)?;
                }
                Ok(())
            }
            GatewayError::Internal { message, operation } => {
                write!(f, "Internal error: {}", message)?;
                if let Some(op) = operation {
                    write!(f, " [operation: {}]", op)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    /// Convert error to appropriate HTTP status code
    ///
    /// - Config errors → 500 (gateway misconfiguration)
    /// - Signature errors → 403 (the request is not authorized)
    /// - Loader errors → 502 (upstream source failure)
    /// - Internal errors → 500
    pub fn to_http_status(&self) -> u16 {
        match self {
            GatewayError::Config { .. } => 500,
            GatewayError::Signature { .. } => 403,
            GatewayError::Loader { .. } => 502,
            GatewayError::Internal { .. } => 500,
        }
    }

    /// Render a compact JSON response body.
    ///
    /// Fields: `error` (category), `message`, `status`, optional
    /// `context` object and `request_id`.
    pub fn to_json_response(&self, request_id: Option<String>) -> String {
        use serde_json::json;

        let (error_type, context) = match self {
            GatewayError::Config { context, .. } => {
                let mut ctx = serde_json::Map::new();
                if let Some(c) = context {
                    ctx.insert("context".to_string(), json!(c));
                }
                ("config", ctx)
            }
            GatewayError::Signature { path, .. } => {
                let mut ctx = serde_json::Map::new();
                if let Some(p) = path {
                    ctx.insert("path".to_string(), json!(p));
                }
                ("signature", ctx)
            }
            GatewayError::Loader { source, .. } => {
                let mut ctx = serde_json::Map::new();
                if let Some(s) = source {
                    ctx.insert("source".to_string(), json!(s));
                }
                ("loader", ctx)
            }
            GatewayError::Internal { operation, .. } => {
                let mut ctx = serde_json::Map::new();
                if let Some(op) = operation {
                    ctx.insert("operation".to_string(), json!(op));
                }
                ("internal", ctx)
            }
        };

        let mut response = json!({
            "error": error_type,
            "message": self.to_string(),
            "status": self.to_http_status(),
        });

        if !context.is_empty() {
            response["context"] = serde_json::Value::Object(context);
        }

        if let Some(id) = request_id {
            response["request_id"] = json!(id);
        }

        response.to_string()
    }

    // Helper constructors for easier error creation with context

    pub fn config(message: impl Into<String>) -> Self {
        GatewayError::Config {
            message: message.into(),
            context: None,
        }
    }

    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        GatewayError::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn signature(message: impl Into<String>) -> Self {
        GatewayError::Signature {
            message: message.into(),
            path: None,
        }
    }

    pub fn signature_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        GatewayError::Signature {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn loader(message: impl Into<String>) -> Self {
        GatewayError::Loader {
            message: message.into(),
            source: None,
        }
    }

    pub fn loader_with_source(message: impl Into<String>, source: impl Into<String>) -> Self {
        GatewayError::Loader {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GatewayError::Internal {
            message: message.into(),
            operation: None,
        }
    }

    pub fn internal_with_operation(
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        GatewayError::Internal {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GatewayError::config_with_context("bad yaml", "loading config.yaml");
        assert_eq!(
            err.to_string(),
            "Configuration error: bad yaml (loading config.yaml)"
        );
        assert_eq!(err.to_http_status(), 500);
    }

    #[test]
    fn test_signature_error_display_and_status() {
        let err = GatewayError::signature_with_path("signature mismatch", "fit-in/300x200/img");
        assert_eq!(
            err.to_string(),
            "Signature error: signature mismatch [path: fit-in/300x200/img]"
        );
        assert_eq!(err.to_http_status(), 403);
    }

    #[test]
    fn test_loader_error_status() {
        let err = GatewayError::loader_with_source("host not allowed", "internal.example.com");
        assert_eq!(err.to_http_status(), 502);
        assert!(err.to_string().contains("internal.example.com"));
    }

    #[test]
    fn test_json_response_shape() {
        let err = GatewayError::signature("missing signature");
        let body = err.to_json_response(Some("req-1".to_string()));
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], "signature");
        assert_eq!(value["status"], 403);
        assert_eq!(value["request_id"], "req-1");
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_json_response_context() {
        let err = GatewayError::loader_with_source("fetch failed", "host/a.png");
        let value: serde_json::Value = serde_json::from_str(&err.to_json_response(None)).unwrap();
        assert_eq!(value["context"]["source"], "host/a.png");
        assert!(value.get("request_id").is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayError>();
    }
}
