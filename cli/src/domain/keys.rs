//! Key-hosting endpoint usernames and fetched key material.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Default key-hosting endpoint; keys live at `<base>/<user>.keys`.
pub const DEFAULT_KEYS_URL: &str = "https://github.com";

const MAX_USERNAME_LEN: usize = 39;

/// Validates a GitHub-style username: 1–39 ASCII alphanumerics or single
/// hyphens, not starting or ending with a hyphen.
///
/// # Errors
///
/// Returns an error if the name could not be a valid account name.
pub fn validate_username(user: &str) -> Result<()> {
    anyhow::ensure!(!user.is_empty(), "username must not be empty");
    anyhow::ensure!(
        user.len() <= MAX_USERNAME_LEN,
        "username is longer than {MAX_USERNAME_LEN} characters"
    );
    anyhow::ensure!(
        user.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
        "username may only contain letters, digits and '-'"
    );
    anyhow::ensure!(
        !user.starts_with('-') && !user.ends_with('-') && !user.contains("--"),
        "username has a misplaced '-'"
    );
    Ok(())
}

/// `<base>/<user>.keys`, tolerating a trailing slash on `base`.
#[must_use]
pub fn keys_url(base: &str, user: &str) -> String {
    format!("{}/{user}.keys", base.trim_end_matches('/'))
}

/// `<home>/.ssh`
#[must_use]
pub fn ssh_dir(home: &Path) -> PathBuf {
    home.join(".ssh")
}

/// `<home>/.ssh/authorized_keys`
#[must_use]
pub fn authorized_keys_path(home: &Path) -> PathBuf {
    ssh_dir(home).join("authorized_keys")
}

/// Returns `true` when the fetched text holds no key lines at all.
#[must_use]
pub fn is_empty_key_list(keys: &str) -> bool {
    keys.lines().all(|l| l.trim().is_empty())
}

/// Text to append to `authorized_keys` so the new keys start on a fresh line
/// and the file ends with a newline.
#[must_use]
pub fn authorized_keys_append(existing: &str, keys: &str) -> String {
    let mut out = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(keys);
    if !keys.ends_with('\n') {
        out.push('\n');
    }
    out
}
