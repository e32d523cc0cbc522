//! SSH daemon hardening rewrite.
//!
//! Each rule replaces every line that mentions the directive, commented or
//! not, with the directive set to the hardened value. Rules apply in order,
//! so a line mentioning two directives ends up as the first rule's directive.

use std::sync::LazyLock;

use regex::Regex;

/// `(directive, value)` pairs, applied in this order.
pub const HARDENING_RULES: [(&str, &str); 3] = [
    ("PubkeyAuthentication", "yes"),
    ("PasswordAuthentication", "no"),
    ("PermitRootLogin", "no"),
];

/// One whole-line matcher per rule, in `HARDENING_RULES` order.
///
/// `.` never matches `\n`, so each match spans exactly one line.
#[allow(clippy::expect_used)]
static DIRECTIVE_LINES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    HARDENING_RULES.map(|(directive, _)| {
        Regex::new(&format!("(?m)^.*{}.*$", regex::escape(directive))).expect("valid regex")
    })
});

/// Rewrite `config` with every hardening rule applied.
///
/// Lines not mentioning any directive are returned byte-for-byte, including
/// the trailing newline state of the file.
#[must_use]
pub fn harden_sshd_config(config: &str) -> String {
    HARDENING_RULES.iter().zip(DIRECTIVE_LINES.iter()).fold(
        config.to_string(),
        |acc, ((directive, value), re)| {
            re.replace_all(&acc, format!("{directive} {value}").as_str())
                .into_owned()
        },
    )
}
