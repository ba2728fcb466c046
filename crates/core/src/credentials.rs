//! Cloud API credentials and region handling.
//!
//! The credential pair is supplied by the host at call time — it is never
//! read from ambient process state and never persisted by this crate.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Region constants
// ---------------------------------------------------------------------------

/// The only region the Global (international) endpoint currently serves.
pub const DEFAULT_REGION: &str = "ap-singapore";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A Tencent Cloud secret id / secret key pair.
///
/// The secret key is used only for request signing; log output must go
/// through [`Credentials::key_hint`] so the plaintext never leaks.
#[derive(Clone)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl Credentials {
    /// Create a credential pair, trimming surrounding whitespace.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into().trim().to_string(),
            secret_key: secret_key.into().trim().to_string(),
        }
    }

    /// Validate that both halves of the pair are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.secret_id.is_empty() {
            return Err(CoreError::Validation(
                "Secret ID must not be empty".to_string(),
            ));
        }
        if self.secret_key.is_empty() {
            return Err(CoreError::Validation(
                "Secret Key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Masked form of the secret key for log output.
    ///
    /// Returns `"...XXXX"` showing only the last 4 characters, or `"****"`
    /// when the key is too short to reveal anything.
    pub fn key_hint(&self) -> String {
        if self.secret_key.len() >= 4 {
            format!("...{}", &self.secret_key[self.secret_key.len() - 4..])
        } else {
            "****".to_string()
        }
    }
}

// Manual Debug so a `{:?}` on a config struct cannot leak the key.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &self.key_hint())
            .finish()
    }
}

/// Validate a region string. Empty regions are rejected; unknown regions are
/// allowed so new rollouts do not require a code change.
pub fn validate_region(region: &str) -> Result<(), CoreError> {
    if region.trim().is_empty() {
        return Err(CoreError::Validation(
            "Region must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
