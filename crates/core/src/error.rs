//! Error type shared by the pure-logic modules.

/// Errors produced by core validation and decision logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An input failed validation before any network or filesystem work.
    #[error("Validation error: {0}")]
    Validation(String),
}
