//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::step::StepKind;

// ── Run aborts ────────────────────────────────────────────────────────────────

/// Why a provisioning run ended early with exit code 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortReason {
    #[error("Abort!")]
    ConsentDeclined,

    #[error("You are not root!")]
    NotRoot,

    #[error("{message}")]
    StepFailed { step: StepKind, message: String },
}

impl AbortReason {
    /// Whether the screen is cleared before the abort message is printed.
    ///
    /// The privilege failure keeps the screen so the operator sees why.
    #[must_use]
    pub fn clears_screen(&self) -> bool {
        !matches!(self, AbortReason::NotRoot)
    }
}

// ── Key fetch errors ──────────────────────────────────────────────────────────

/// Errors fetching public keys from the key-hosting endpoint.
#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("No keys published for '{0}' (user not found).")]
    NotFound(String),

    #[error("Key server answered HTTP {0}.")]
    Status(u16),

    #[error("Cannot reach key server: {0}")]
    Network(String),
}
