//! Scripted answers and the host paths the steps touch.
//!
//! Pure data only: loading from disk lives in `infra::answers`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::autologin::{GETTY_OVERRIDE_DIR, GETTY_OVERRIDE_FILE};
use crate::domain::step::{Question, StepKind};

// ── Answers file schema ──────────────────────────────────────────────────────

/// Answers for scripted (non-interactive) runs, read from YAML.
///
/// Every field defaults to declining, so an empty file aborts at the consent
/// gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Answers {
    pub consent: bool,
    pub update: bool,
    /// New hostname; absent declines the hostname step.
    pub hostname: Option<String>,
    pub passwordless_sudo: bool,
    pub admin_group: bool,
    /// Account whose keys are imported; absent declines the key import.
    pub github_user: Option<String>,
    /// Accept the fetched key material without seeing it.
    pub confirm_keys: bool,
    pub harden_sshd: bool,
    pub autologin: bool,
    pub reset_host_keys: bool,
    pub remove_script: bool,
    pub reboot: bool,
}

impl Answers {
    /// Scripted answer to a yes/no question.
    #[must_use]
    pub fn confirm(&self, question: Question) -> bool {
        match question {
            Question::Consent => self.consent,
            Question::KeysConfirm => self.confirm_keys,
            Question::Hostname => self.hostname.is_some(),
            Question::KeysUser => self.github_user.is_some(),
            Question::Step(step) => match step {
                StepKind::Update => self.update,
                StepKind::Hostname => self.hostname.is_some(),
                StepKind::PasswordlessSudo => self.passwordless_sudo,
                StepKind::AdminGroup => self.admin_group,
                StepKind::GithubKeys => self.github_user.is_some(),
                StepKind::HardenSshd => self.harden_sshd,
                StepKind::Autologin => self.autologin,
                StepKind::ResetHostKeys => self.reset_host_keys,
                StepKind::RemoveScript => self.remove_script,
                StepKind::Reboot => self.reboot,
            },
        }
    }

    /// Scripted answer to a text input question; `None` declines.
    #[must_use]
    pub fn input(&self, question: Question) -> Option<&str> {
        match question {
            Question::Hostname => self.hostname.as_deref(),
            Question::KeysUser => self.github_user.as_deref(),
            _ => None,
        }
    }
}

// ── Host paths ───────────────────────────────────────────────────────────────

/// Files and directories the provisioning steps read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub sudoers: PathBuf,
    pub sshd_config: PathBuf,
    /// Directory holding `ssh_host_*` key files.
    pub ssh_host_key_dir: PathBuf,
    pub getty_override_dir: PathBuf,
    /// Active login profile, restored from `profile_backup` on self-removal.
    pub profile: PathBuf,
    pub profile_backup: PathBuf,
    /// The running executable.
    pub script: PathBuf,
}

/// Prefix of SSH host key file names.
pub const SSH_HOST_KEY_PREFIX: &str = "ssh_host_";

impl HostPaths {
    /// Standard system locations, with the profile files in `profile_dir`.
    #[must_use]
    pub fn system(profile_dir: &Path, script: PathBuf) -> Self {
        Self {
            sudoers: PathBuf::from("/etc/sudoers"),
            sshd_config: PathBuf::from("/etc/ssh/sshd_config"),
            ssh_host_key_dir: PathBuf::from("/etc/ssh"),
            getty_override_dir: PathBuf::from(GETTY_OVERRIDE_DIR),
            profile: profile_dir.join(".profile"),
            profile_backup: profile_dir.join(".profile.original"),
            script,
        }
    }

    #[must_use]
    pub fn getty_override_file(&self) -> PathBuf {
        self.getty_override_dir.join(GETTY_OVERRIDE_FILE)
    }

    /// Whether `path` names an SSH host key (private or public).
    #[must_use]
    pub fn is_host_key(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SSH_HOST_KEY_PREFIX))
    }
}
