//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`
//! or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{CommandSpec, Question};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of running one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `true` when the process exited with status 0.
    pub succeeded: bool,
    /// Exit status; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Combined stdout and stderr, in the order the lines arrived.
    pub output: String,
}

impl CommandOutcome {
    #[must_use]
    pub fn from_code(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            succeeded: exit_code == 0,
            exit_code,
            output: output.into(),
        }
    }
}

/// Signature of an input validator: `Err` carries the message shown to the
/// operator.
pub type Validator = fn(&str) -> Result<()>;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command to completion, streaming its combined output to the
    /// console. No timeout: long package upgrades block until they finish.
    ///
    /// A non-zero exit is a normal `Ok` outcome; `Err` means the process could
    /// not be spawned or waited on.
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutcome>;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Text-console dialogs shown to the operator.
pub trait Prompter {
    /// Yes/no dialog. `Ok(false)` when the operator declines or cancels.
    fn confirm(&self, question: Question, text: &str) -> Result<bool>;

    /// Single-line input, optionally pre-filled. `Ok(None)` when declined or
    /// left empty.
    ///
    /// A non-empty value rejected by `validate` is never returned.
    fn input(
        &self,
        question: Question,
        text: &str,
        initial: Option<&str>,
        validate: Option<Validator>,
    ) -> Result<Option<String>>;

    /// Message box that waits for acknowledgement.
    fn message(&self, text: &str) -> Result<()>;

    /// Error dialog that waits for acknowledgement.
    fn error(&self, text: &str) -> Result<()>;

    /// Clear the terminal.
    fn clear(&self) -> Result<()>;
}

// ── Host Facts Port ───────────────────────────────────────────────────────────

/// Read-only facts about the running host and its users.
pub trait HostInfo {
    /// Whether the effective user is root.
    fn is_root(&self) -> bool;
    /// Current hostname.
    fn hostname(&self) -> Result<String>;
    /// Login name of the operator who started the session.
    fn login_name(&self) -> Result<String>;
    /// Home directory of `user` from the passwd database.
    fn home_dir(&self, user: &str) -> Result<PathBuf>;
}

// ── Key Fetch Port ────────────────────────────────────────────────────────────

/// Fetches public keys published for an account.
#[allow(async_fn_in_trait)]
pub trait KeyFetcher {
    /// Newline-separated public keys for `user`, verbatim.
    async fn fetch_keys(&self, user: &str) -> Result<String>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the filesystem operations the provisioning steps perform.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Create or truncate `path` and write `content`.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Append `content`, creating the file if needed.
    fn append(&self, path: &Path, content: &str) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Entries directly inside `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a skip / informational message.
    fn info(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
