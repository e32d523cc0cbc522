//! Structured command specifications.
//!
//! Every external command is an explicit program plus argument list; nothing
//! is ever handed to a shell, so hostnames, usernames and paths need no
//! quoting.

use std::fmt;
use std::path::Path;

/// Group that receives passwordless sudo and the invoking user.
pub const ADMIN_GROUP: &str = "admin";

/// `groupadd` exit status meaning "group already exists".
pub const GROUPADD_EXISTS: i32 = 9;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    #[must_use]
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn apt_update() -> Self {
        Self::new("apt-get", ["update", "--yes"])
    }

    #[must_use]
    pub fn apt_upgrade() -> Self {
        Self::new("apt-get", ["upgrade", "--yes"])
    }

    #[must_use]
    pub fn set_hostname(hostname: &str) -> Self {
        Self::new("hostnamectl", ["set-hostname", hostname])
    }

    #[must_use]
    pub fn groupadd(group: &str) -> Self {
        Self::new("groupadd", [group])
    }

    #[must_use]
    pub fn add_to_group(user: &str, group: &str) -> Self {
        Self::new("usermod", ["-a", "-G", group, user])
    }

    #[must_use]
    pub fn chown(user: &str, path: &Path) -> Self {
        Self::new("chown", [user.to_string(), path.display().to_string()])
    }

    /// `rm -v <paths...>`
    #[must_use]
    pub fn remove_verbose(paths: &[std::path::PathBuf]) -> Self {
        let mut args = vec!["-v".to_string()];
        args.extend(paths.iter().map(|p| p.display().to_string()));
        Self::new("/bin/rm", args)
    }

    #[must_use]
    pub fn reconfigure_openssh() -> Self {
        Self::new("/usr/sbin/dpkg-reconfigure", ["openssh-server"])
    }

    #[must_use]
    pub fn reboot() -> Self {
        Self::new("shutdown", ["-r", "now"])
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
