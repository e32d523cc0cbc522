//! Hostname validation.

use anyhow::Result;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Validates a hostname against RFC 1123.
///
/// Dot-separated labels of 1–63 ASCII letters, digits or hyphens; labels do
/// not start or end with a hyphen; at most 253 characters overall.
///
/// # Errors
///
/// Returns an error describing the first rule the name breaks.
pub fn validate_hostname(name: &str) -> Result<()> {
    anyhow::ensure!(!name.is_empty(), "hostname must not be empty");
    anyhow::ensure!(
        name.len() <= MAX_HOSTNAME_LEN,
        "hostname is longer than {MAX_HOSTNAME_LEN} characters"
    );
    for label in name.split('.') {
        anyhow::ensure!(!label.is_empty(), "hostname contains an empty label");
        anyhow::ensure!(
            label.len() <= MAX_LABEL_LEN,
            "label '{label}' is longer than {MAX_LABEL_LEN} characters"
        );
        anyhow::ensure!(
            label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
            "label '{label}' may only contain letters, digits and '-'"
        );
        anyhow::ensure!(
            !label.starts_with('-') && !label.ends_with('-'),
            "label '{label}' must not start or end with '-'"
        );
    }
    Ok(())
}
