//! Provisioning steps, profiles and the ordered step plan.
//!
//! Pure types only: the sequencer in `application::services` decides what
//! each step does at runtime.

use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};

// ── Steps ─────────────────────────────────────────────────────────────────────

/// One unit of the provisioning sequence.
///
/// Declaration order is the canonical execution order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    /// Refresh package lists and upgrade installed packages.
    Update,
    /// Change the machine hostname.
    Hostname,
    /// Grant the `admin` group passwordless sudo.
    PasswordlessSudo,
    /// Create the `admin` group and add the invoking user to it.
    AdminGroup,
    /// Import public keys from the key-hosting endpoint.
    GithubKeys,
    /// Restrict the SSH daemon to public-key logins.
    HardenSshd,
    /// Auto-login the invoking user on tty1.
    Autologin,
    /// Remove and regenerate SSH host keys.
    ResetHostKeys,
    /// Restore the original profile and delete this executable.
    RemoveScript,
    /// Restart the machine.
    Reboot,
}

/// What happens to the run when a step's action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Show the error, then terminate the run with exit code 1.
    Fatal,
    /// Show the error, then continue with the next step.
    NonFatal,
}

impl StepKind {
    /// Every step in canonical order.
    pub const ALL: [StepKind; 10] = [
        StepKind::Update,
        StepKind::Hostname,
        StepKind::PasswordlessSudo,
        StepKind::AdminGroup,
        StepKind::GithubKeys,
        StepKind::HardenSshd,
        StepKind::Autologin,
        StepKind::ResetHostKeys,
        StepKind::RemoveScript,
        StepKind::Reboot,
    ];

    /// Kebab-case name used on the command line and in abort messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StepKind::Update => "update",
            StepKind::Hostname => "hostname",
            StepKind::PasswordlessSudo => "passwordless-sudo",
            StepKind::AdminGroup => "admin-group",
            StepKind::GithubKeys => "github-keys",
            StepKind::HardenSshd => "harden-sshd",
            StepKind::Autologin => "autologin",
            StepKind::ResetHostKeys => "reset-host-keys",
            StepKind::RemoveScript => "remove-script",
            StepKind::Reboot => "reboot",
        }
    }

    #[must_use]
    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            StepKind::ResetHostKeys => FailurePolicy::Fatal,
            _ => FailurePolicy::NonFatal,
        }
    }

    /// The yes/no question asked before the step runs.
    ///
    /// `Hostname` has no yes/no gate; its input dialog is the gate.
    #[must_use]
    pub fn prompt(self, login: &str) -> String {
        match self {
            StepKind::Update => "Do you want to update the system?".to_string(),
            StepKind::Hostname => "Set Hostname".to_string(),
            StepKind::PasswordlessSudo => "Allow passwordless sudo for admin group?".to_string(),
            StepKind::AdminGroup => format!("Add user '{login}' to admin group now?"),
            StepKind::GithubKeys => "Add Github keys to authorized_keys?".to_string(),
            StepKind::HardenSshd => {
                "Fix SSHD config to NOT permit password logins (public keys only)?".to_string()
            }
            StepKind::Autologin => format!(
                "Enable tty autologin for user '{login}'? \
                 This will reset existing tty1 configuration."
            ),
            StepKind::ResetHostKeys => "Reset SSH keys?".to_string(),
            StepKind::RemoveScript => "Remove this script?".to_string(),
            StepKind::Reboot => "Reboot?".to_string(),
        }
    }

    /// Log line when the operator accepts the step.
    #[must_use]
    pub fn accepted_message(self) -> &'static str {
        match self {
            StepKind::Update => "Performing update",
            StepKind::Hostname => "Setting hostname",
            StepKind::PasswordlessSudo => "Granting passwordless sudo to admin group",
            StepKind::AdminGroup => "Adding user to admin group",
            StepKind::GithubKeys => "Importing public keys",
            StepKind::HardenSshd => "Hardening SSHD config",
            StepKind::Autologin => "Enabling tty autologin",
            StepKind::ResetHostKeys => "Resetting SSH keys",
            StepKind::RemoveScript => "Destroying provisioning script",
            StepKind::Reboot => "Rebooting!",
        }
    }

    /// Log line when the step's action succeeded.
    #[must_use]
    pub fn done_message(self) -> &'static str {
        match self {
            StepKind::Update => "System updated",
            StepKind::Hostname => "Hostname set",
            StepKind::PasswordlessSudo => "Passwordless sudo granted",
            StepKind::AdminGroup => "User added to admin group",
            StepKind::GithubKeys => "Public keys installed",
            StepKind::HardenSshd => "SSHD config hardened",
            StepKind::Autologin => "tty autologin enabled",
            StepKind::ResetHostKeys => "SSH host keys regenerated",
            StepKind::RemoveScript => "Provisioning script removed",
            StepKind::Reboot => "Reboot issued",
        }
    }

    /// Log line when the operator declines the step.
    #[must_use]
    pub fn declined_message(self) -> &'static str {
        match self {
            StepKind::Update => "NOT performing update",
            StepKind::Hostname => "NOT setting hostname",
            StepKind::PasswordlessSudo => "NOT granting passwordless sudo",
            StepKind::AdminGroup => "NOT adding user to admin group",
            StepKind::GithubKeys => "NOT importing public keys",
            StepKind::HardenSshd => "NOT changing SSHD config",
            StepKind::Autologin => "NOT enabling tty autologin",
            StepKind::ResetHostKeys => "NOT resetting SSH keys",
            StepKind::RemoveScript => "leaving provisioning script in place",
            StepKind::Reboot => "NOT rebooting",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StepKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|step| step.name() == s)
            .ok_or_else(|| anyhow!("unknown step '{s}'"))
    }
}

// ── Prompts ───────────────────────────────────────────────────────────────────

/// Identifies a single prompt so scripted prompters can answer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    /// Initial "do you want to do that now?" gate.
    Consent,
    /// The yes/no gate in front of a step.
    Step(StepKind),
    /// The hostname input dialog.
    Hostname,
    /// The key-hosting username input dialog.
    KeysUser,
    /// Second confirmation showing the fetched key material.
    KeysConfirm,
}

pub const CONSENT_PROMPT: &str = "This VM is built from a template and needs some work \
     in order to be used safely!\nDo you want to do that now?";

pub const BACKGROUND_TITLE: &str = "Ubuntu VM provisioning";

// ── Profiles and plans ────────────────────────────────────────────────────────

/// Predefined step-selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Every step.
    #[default]
    Full,
    /// Without key import, SSHD hardening and autologin.
    Minimal,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Full, Profile::Minimal];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::Minimal => "minimal",
        }
    }

    #[must_use]
    pub fn includes(self, step: StepKind) -> bool {
        match self {
            Profile::Full => true,
            Profile::Minimal => !matches!(
                step,
                StepKind::GithubKeys | StepKind::HardenSshd | StepKind::Autologin
            ),
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|profile| profile.name() == s)
            .ok_or_else(|| anyhow!("unknown profile '{s}'"))
    }
}

/// The ordered list of steps offered during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<StepKind>,
}

impl StepPlan {
    /// Build a plan from a profile minus explicitly skipped steps.
    ///
    /// Steps always come out in canonical order, so self-removal stays the
    /// last step before reboot whatever the selection.
    #[must_use]
    pub fn new(profile: Profile, skip: &[StepKind]) -> Self {
        let steps = StepKind::ALL
            .into_iter()
            .filter(|s| profile.includes(*s) && !skip.contains(s))
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[StepKind] {
        &self.steps
    }

    #[must_use]
    pub fn contains(&self, step: StepKind) -> bool {
        self.steps.contains(&step)
    }
}

impl Default for StepPlan {
    fn default() -> Self {
        Self::new(Profile::Full, &[])
    }
}
