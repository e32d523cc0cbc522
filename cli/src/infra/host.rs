//! Host facts: implements `HostInfo` with `nix` and the passwd database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use nix::unistd::{User, geteuid, gethostname};
use tracing::debug;

use crate::application::ports::HostInfo;

/// Production `HostInfo` for the machine the tool runs on.
pub struct SystemHost;

impl HostInfo for SystemHost {
    fn is_root(&self) -> bool {
        geteuid().is_root()
    }

    fn hostname(&self) -> Result<String> {
        let name = gethostname().context("reading hostname")?;
        Ok(name.to_string_lossy().trim().to_string())
    }

    /// The session's login name as reported by `logname`, falling back to
    /// `SUDO_USER` when there is no controlling terminal.
    fn login_name(&self) -> Result<String> {
        match logname() {
            Ok(name) => Ok(name),
            Err(e) => {
                debug!(error = %e, "logname failed, trying SUDO_USER");
                std::env::var("SUDO_USER")
                    .ok()
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| anyhow::anyhow!("cannot determine login name: {e:#}"))
            }
        }
    }

    fn home_dir(&self, user: &str) -> Result<PathBuf> {
        let entry = User::from_name(user)
            .with_context(|| format!("looking up user '{user}'"))?
            .ok_or_else(|| anyhow::anyhow!("no passwd entry for user '{user}'"))?;
        Ok(entry.dir)
    }
}

fn logname() -> Result<String> {
    let output = std::process::Command::new("logname")
        .output()
        .context("failed to spawn logname")?;
    anyhow::ensure!(
        output.status.success(),
        "logname: {}",
        String::from_utf8_lossy(&output.stderr).trim()
    );
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    anyhow::ensure!(!name.is_empty(), "logname printed nothing");
    Ok(name)
}
