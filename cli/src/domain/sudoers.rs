//! Passwordless-sudo grant for the admin group.

/// The directive granted to the admin group.
pub const NOPASSWD_DIRECTIVE: &str = "%admin ALL=(ALL) NOPASSWD: ALL";

const NOPASSWD_COMMENT: &str =
    "#Allow members of the admin group to execute commands WITHOUT A PASSWORD!";

/// Text to append to the sudoers file, or `None` when the directive is
/// already present.
#[must_use]
pub fn sudoers_patch(contents: &str) -> Option<String> {
    if contents.contains(NOPASSWD_DIRECTIVE) {
        return None;
    }
    Some(format!("\n{NOPASSWD_COMMENT}\n{NOPASSWD_DIRECTIVE}\n"))
}

/// Number of lines that are exactly the directive.
#[must_use]
pub fn directive_count(contents: &str) -> usize {
    contents
        .lines()
        .filter(|l| l.trim() == NOPASSWD_DIRECTIVE)
        .count()
}
