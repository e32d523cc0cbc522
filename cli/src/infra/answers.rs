//! Loads the scripted answers file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::Answers;

/// Read and parse an answers file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid answers
/// document (unknown keys included).
pub fn load_answers(path: &Path) -> Result<Answers> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read answers file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse answers file {}", path.display()))
}
