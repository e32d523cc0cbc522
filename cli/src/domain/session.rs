//! Transient values collected during one provisioning run.

/// In-memory session state, passed explicitly through the sequencer.
///
/// Nothing here is persisted; it is dropped when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Login name of the operator who invoked the tool (via sudo or su).
    pub login: String,
    /// Hostname applied during the hostname step.
    pub hostname: Option<String>,
    /// Public key material accepted during the key import step.
    pub keys: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Self::default()
        }
    }
}
