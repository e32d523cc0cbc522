//! System actions: the side-effecting half of each provisioning step.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every function assumes the operator already confirmed the step; the
//! sequencer owns gating and failure policy.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::application::ports::{CommandOutcome, CommandRunner, LocalFs};
use crate::domain::autologin::autologin_override;
use crate::domain::command::{ADMIN_GROUP, GROUPADD_EXISTS};
use crate::domain::keys::{authorized_keys_append, authorized_keys_path, ssh_dir};
use crate::domain::sshd::harden_sshd_config;
use crate::domain::sudoers::sudoers_patch;
use crate::domain::{CommandSpec, HostPaths};

pub const HOST_KEY_REMOVE_FAILED: &str = "Error resetting SSH keys! (removing old keys)";
pub const HOST_KEY_GENERATE_FAILED: &str = "Error resetting SSH keys! (generating new keys)";

const AUTHORIZED_KEYS_MODE: u32 = 0o644;
const SSH_DIR_MODE: u32 = 0o700;

/// Result of a confirmed step's action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action changed the host.
    Applied,
    /// The host was already in the desired state; nothing was written.
    AlreadyApplied,
    /// The action failed; the message is shown to the operator.
    Failed(String),
}

fn failed_status(what: &str, outcome: &CommandOutcome) -> StepOutcome {
    StepOutcome::Failed(format!("Error {what}: exit status {}!", outcome.exit_code))
}

/// `apt-get update --yes && apt-get upgrade --yes`.
///
/// # Errors
///
/// Returns an error if either command cannot be spawned.
pub async fn update_system(runner: &impl CommandRunner) -> Result<StepOutcome> {
    let mut outcome = runner.run(&CommandSpec::apt_update()).await?;
    if outcome.succeeded {
        outcome = runner.run(&CommandSpec::apt_upgrade()).await?;
    }
    if outcome.succeeded {
        Ok(StepOutcome::Applied)
    } else {
        Ok(failed_status("updating", &outcome))
    }
}

/// `hostnamectl set-hostname <hostname>`.
///
/// # Errors
///
/// Returns an error if `hostnamectl` cannot be spawned.
pub async fn set_hostname(runner: &impl CommandRunner, hostname: &str) -> Result<StepOutcome> {
    let outcome = runner.run(&CommandSpec::set_hostname(hostname)).await?;
    if outcome.succeeded {
        info!(hostname, "hostname changed");
        Ok(StepOutcome::Applied)
    } else {
        Ok(failed_status("setting hostname", &outcome))
    }
}

/// Append the admin group's passwordless-sudo directive unless present.
///
/// # Errors
///
/// Returns an error if the sudoers file cannot be read or appended to.
pub fn grant_passwordless_sudo(fs: &impl LocalFs, paths: &HostPaths) -> Result<StepOutcome> {
    let contents = fs.read_to_string(&paths.sudoers)?;
    let Some(patch) = sudoers_patch(&contents) else {
        debug!(path = %paths.sudoers.display(), "sudoers directive already present");
        return Ok(StepOutcome::AlreadyApplied);
    };
    fs.append(&paths.sudoers, &patch)?;
    Ok(StepOutcome::Applied)
}

/// Create the admin group (an existing group is fine) and add `login` to it.
///
/// # Errors
///
/// Returns an error if `groupadd` or `usermod` cannot be spawned.
pub async fn join_admin_group(runner: &impl CommandRunner, login: &str) -> Result<StepOutcome> {
    let created = runner.run(&CommandSpec::groupadd(ADMIN_GROUP)).await?;
    if !created.succeeded && created.exit_code != GROUPADD_EXISTS {
        return Ok(failed_status(&format!("creating group '{ADMIN_GROUP}'"), &created));
    }
    let added = runner
        .run(&CommandSpec::add_to_group(login, ADMIN_GROUP))
        .await?;
    if added.succeeded {
        Ok(StepOutcome::Applied)
    } else {
        Ok(failed_status(
            &format!("adding '{login}' to group '{ADMIN_GROUP}'"),
            &added,
        ))
    }
}

/// Append `keys` to `<home>/.ssh/authorized_keys` and hand it to `login`.
///
/// A `.ssh` directory created here also gets mode 0700 and `login` as owner.
///
/// # Errors
///
/// Returns an error if a filesystem operation fails or `chown` cannot be
/// spawned.
pub async fn install_authorized_keys(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    login: &str,
    home: &Path,
    keys: &str,
) -> Result<StepOutcome> {
    let dir = ssh_dir(home);
    let created_dir = !fs.exists(&dir);
    if created_dir {
        fs.create_dir_all(&dir)?;
        fs.set_permissions(&dir, SSH_DIR_MODE)?;
    }

    let path = authorized_keys_path(home);
    let existing = if fs.exists(&path) {
        fs.read_to_string(&path)?
    } else {
        String::new()
    };
    fs.append(&path, &authorized_keys_append(&existing, keys))?;
    fs.set_permissions(&path, AUTHORIZED_KEYS_MODE)?;

    let mut owned: Vec<PathBuf> = Vec::with_capacity(2);
    if created_dir {
        owned.push(dir);
    }
    owned.push(path);
    for target in &owned {
        let outcome = runner.run(&CommandSpec::chown(login, target)).await?;
        if !outcome.succeeded {
            return Ok(failed_status(
                &format!("changing owner of {}", target.display()),
                &outcome,
            ));
        }
    }
    Ok(StepOutcome::Applied)
}

/// Rewrite the SSH daemon config to allow public-key logins only.
///
/// # Errors
///
/// Returns an error if the config cannot be read or written.
pub fn harden_sshd(fs: &impl LocalFs, paths: &HostPaths) -> Result<StepOutcome> {
    let config = fs.read_to_string(&paths.sshd_config)?;
    let hardened = harden_sshd_config(&config);
    if hardened == config {
        return Ok(StepOutcome::AlreadyApplied);
    }
    fs.write(&paths.sshd_config, &hardened)?;
    Ok(StepOutcome::Applied)
}

/// Write the tty1 getty override, replacing any existing one.
///
/// # Errors
///
/// Returns an error if the override directory or file cannot be written.
pub fn enable_autologin(fs: &impl LocalFs, paths: &HostPaths, login: &str) -> Result<StepOutcome> {
    fs.create_dir_all(&paths.getty_override_dir)?;
    fs.write(&paths.getty_override_file(), &autologin_override(login))?;
    Ok(StepOutcome::Applied)
}

/// Remove every SSH host key, then regenerate them.
///
/// Failures of either sub-step come back as `Failed` with the sub-step's
/// message; finding no host keys to remove counts as a removal failure.
///
/// # Errors
///
/// Never returns `Err` for removal or regeneration failures; those are
/// reported as `StepOutcome::Failed`.
pub async fn reset_host_keys(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    paths: &HostPaths,
) -> Result<StepOutcome> {
    let removal = fs.list_dir(&paths.ssh_host_key_dir).map(|entries| {
        entries
            .into_iter()
            .filter(|p| HostPaths::is_host_key(p))
            .collect::<Vec<_>>()
    });
    let key_files = match removal {
        Ok(files) if !files.is_empty() => files,
        Ok(_) => {
            debug!(dir = %paths.ssh_host_key_dir.display(), "no host keys found");
            return Ok(StepOutcome::Failed(HOST_KEY_REMOVE_FAILED.to_string()));
        }
        Err(e) => {
            debug!(error = %e, "listing host keys failed");
            return Ok(StepOutcome::Failed(HOST_KEY_REMOVE_FAILED.to_string()));
        }
    };

    if !command_succeeded(runner, &CommandSpec::remove_verbose(&key_files)).await {
        return Ok(StepOutcome::Failed(HOST_KEY_REMOVE_FAILED.to_string()));
    }
    if !command_succeeded(runner, &CommandSpec::reconfigure_openssh()).await {
        return Ok(StepOutcome::Failed(HOST_KEY_GENERATE_FAILED.to_string()));
    }
    Ok(StepOutcome::Applied)
}

async fn command_succeeded(runner: &impl CommandRunner, cmd: &CommandSpec) -> bool {
    match runner.run(cmd).await {
        Ok(outcome) => outcome.succeeded,
        Err(e) => {
            debug!(command = %cmd, error = %e, "command could not run");
            false
        }
    }
}

/// Restore the original profile and delete the running executable.
///
/// The executable is removed even when no profile backup exists; the missing
/// backup is then reported as a failure.
///
/// # Errors
///
/// Returns an error if copying or removing a file fails.
pub fn remove_self(fs: &impl LocalFs, paths: &HostPaths) -> Result<StepOutcome> {
    let restored = fs.exists(&paths.profile_backup);
    if restored {
        fs.copy(&paths.profile_backup, &paths.profile)?;
        fs.remove_file(&paths.profile_backup)?;
    }
    fs.remove_file(&paths.script)?;
    if restored {
        Ok(StepOutcome::Applied)
    } else {
        Ok(StepOutcome::Failed(format!(
            "No original profile at {}; {} left unchanged.",
            paths.profile_backup.display(),
            paths.profile.display()
        )))
    }
}

/// `shutdown -r now`.
///
/// # Errors
///
/// Returns an error if `shutdown` cannot be spawned.
pub async fn reboot(runner: &impl CommandRunner) -> Result<StepOutcome> {
    let outcome = runner.run(&CommandSpec::reboot()).await?;
    if outcome.succeeded {
        Ok(StepOutcome::Applied)
    } else {
        Ok(failed_status("rebooting", &outcome))
    }
}
