// Request pipeline module - request context and signature authorization

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::config::SigningConfig;
use crate::error::GatewayError;
use crate::imagepath::{constant_time_compare, parse, sign, Params};

/// Context for one transformation request as it flows through the
/// pipeline. The path handed in must already be prefix-stripped; it is
/// parsed exactly once, on construction, and the resulting [`Params`]
/// are immutable for the rest of the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    timestamp: u64,
    params: Params,
}

impl RequestContext {
    /// Create a new RequestContext from HTTP request information.
    /// Generates a unique request ID (UUID v4) and captures the current
    /// timestamp.
    pub fn new(method: String, path: String) -> Self {
        let params = parse(&path);
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            params,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw request path this context was built from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Unix timestamp (seconds) of request arrival.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Authorize this request against the signing configuration.
    pub fn authorize(&self, signing: &SigningConfig) -> Result<(), GatewayError> {
        authorize(&self.params, signing)
    }
}

/// The verify half of signing: decide whether a parsed request may be
/// served.
///
/// `unsafe/` requests pass only when unsafe mode is enabled. Signed
/// requests pass when the recomputed signature over `params.path`
/// matches the one extracted from the URL, compared in constant time.
/// Everything else is a signature failure the server reports as 403.
pub fn authorize(params: &Params, signing: &SigningConfig) -> Result<(), GatewayError> {
    if params.is_unsafe {
        if signing.allow_unsafe {
            return Ok(());
        }
        return Err(GatewayError::signature_with_path(
            "unsafe requests are disabled",
            &params.path,
        ));
    }

    let secret = match signing.secret.as_deref() {
        Some(secret) => secret,
        None => {
            return Err(GatewayError::signature(
                "no signing secret configured, signed requests cannot be verified",
            ));
        }
    };

    if params.hash.is_empty() {
        return Err(GatewayError::signature_with_path(
            "missing signature",
            &params.path,
        ));
    }

    let expected = sign(&params.path, secret);
    if constant_time_compare(&params.hash, &expected) {
        Ok(())
    } else {
        Err(GatewayError::signature_with_path(
            "signature mismatch",
            &params.path,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagepath::generate;

    fn signed_config() -> SigningConfig {
        SigningConfig {
            secret: Some("1234".to_string()),
            allow_unsafe: false,
        }
    }

    #[test]
    fn test_request_context_new() {
        let ctx = RequestContext::new("GET".to_string(), "unsafe/300x200/img".to_string());
        assert_eq!(ctx.method(), "GET");
        assert_eq!(ctx.path(), "unsafe/300x200/img");
        assert_eq!(ctx.params().width, 300);
        assert!(ctx.params().is_unsafe);
        assert!(!ctx.request_id().is_empty());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new("GET".to_string(), "img".to_string());
        let b = RequestContext::new("GET".to_string(), "img".to_string());
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_authorize_unsafe_allowed() {
        let signing = SigningConfig {
            secret: None,
            allow_unsafe: true,
        };
        let params = parse("unsafe/300x200/img");
        assert!(authorize(&params, &signing).is_ok());
    }

    #[test]
    fn test_authorize_unsafe_rejected_when_disabled() {
        let params = parse("unsafe/300x200/img");
        let err = authorize(&params, &signed_config()).unwrap_err();
        assert_eq!(err.to_http_status(), 403);
    }

    #[test]
    fn test_authorize_valid_signature() {
        let unsigned = parse("300x200/filters:blur(5)/img");
        let uri = generate(&unsigned, "1234");
        let params = parse(&uri);
        assert!(authorize(&params, &signed_config()).is_ok());
    }

    #[test]
    fn test_authorize_signature_mismatch() {
        let unsigned = parse("300x200/img");
        let uri = generate(&unsigned, "wrong-secret");
        let params = parse(&uri);
        let err = authorize(&params, &signed_config()).unwrap_err();
        assert_eq!(err.to_http_status(), 403);
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_authorize_missing_signature() {
        let params = parse("300x200/img");
        let err = authorize(&params, &signed_config()).unwrap_err();
        assert!(err.to_string().contains("missing signature"));
    }

    #[test]
    fn test_authorize_no_secret_configured() {
        let signing = SigningConfig {
            secret: None,
            allow_unsafe: false,
        };
        let unsigned = parse("300x200/img");
        let uri = generate(&unsigned, "1234");
        let params = parse(&uri);
        assert!(authorize(&params, &signing).is_err());
    }
}
