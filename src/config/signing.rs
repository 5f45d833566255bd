//! Signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// How requests are authorized: a shared HMAC secret, an explicit unsafe
/// mode, or both (signed requests are still verified when unsafe mode is
/// on).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Shared secret for path signatures. Absent means no signed request
    /// can be accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Accept requests carrying the `unsafe/` prefix.
    #[serde(default)]
    pub allow_unsafe: bool,
}

impl SigningConfig {
    /// A gateway that can authorize nothing is a misconfiguration.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.secret.is_none() && !self.allow_unsafe {
            return Err(GatewayError::config(
                "either a signing secret or unsafe mode must be configured",
            ));
        }
        Ok(())
    }
}
