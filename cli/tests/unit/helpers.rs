//! Shared test doubles for the port traits.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, bail};
use firstboot_cli::application::ports::{
    CommandOutcome, CommandRunner, HostInfo, KeyFetcher, LocalFs, ProgressReporter, Prompter,
    Validator,
};
use firstboot_cli::domain::{Answers, CommandSpec, HostPaths, KeyFetchError, Question};

pub const LOGIN: &str = "alice";
pub const HOME: &str = "/home/alice";
pub const TEMPLATE_HOSTNAME: &str = "ubuntu-template";

pub const SUDOERS: &str = "root ALL=(ALL:ALL) ALL\n%sudo ALL=(ALL:ALL) ALL\n";
pub const SSHD_CONFIG: &str = "\
Include /etc/ssh/sshd_config.d/*.conf
#PermitRootLogin prohibit-password
PasswordAuthentication yes
ChallengeResponseAuthentication no
";
pub const PROFILE_ORIGINAL: &str = "# ~/.profile\nexport PATH=\"$HOME/bin:$PATH\"\n";
pub const PROFILE_HOOK: &str = "sudo ./firstboot\n";

// ── Paths and fixtures ───────────────────────────────────────────────────────

pub fn test_paths() -> HostPaths {
    HostPaths::system(Path::new(HOME), PathBuf::from("/home/alice/firstboot"))
}

/// A freshly cloned template: sudoers, sshd config, host keys, the profile
/// hook with its backup, and the provisioning executable.
pub fn template_fs() -> MemoryFs {
    let paths = test_paths();
    let fs = MemoryFs::default();
    fs.add_file(&paths.sudoers, SUDOERS);
    fs.add_file(&paths.sshd_config, SSHD_CONFIG);
    for name in [
        "ssh_host_ed25519_key",
        "ssh_host_ed25519_key.pub",
        "ssh_host_rsa_key",
        "ssh_host_rsa_key.pub",
        "moduli",
    ] {
        fs.add_file(&paths.ssh_host_key_dir.join(name), "key material\n");
    }
    fs.add_file(&paths.profile, PROFILE_HOOK);
    fs.add_file(&paths.profile_backup, PROFILE_ORIGINAL);
    fs.add_file(&paths.script, "#!binary\n");
    fs
}

// ── CommandRunner ────────────────────────────────────────────────────────────

/// Records every command; commands succeed unless told otherwise.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    /// Rendered-command prefix and the exit code to return for it.
    failures: Vec<(String, i32)>,
    /// Programs that cannot be spawned.
    unspawnable: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(mut self, prefix: &str, exit_code: i32) -> Self {
        self.failures.push((prefix.to_string(), exit_code));
        self
    }

    #[must_use]
    pub fn unspawnable(mut self, program: &str) -> Self {
        self.unspawnable.push(program.to_string());
        self
    }

    /// Every command run so far, rendered as `program arg...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutcome> {
        self.calls.lock().expect("lock").push(cmd.clone());
        if self.unspawnable.contains(&cmd.program) {
            bail!("failed to spawn {}", cmd.program);
        }
        let rendered = cmd.to_string();
        let code = self
            .failures
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map_or(0, |(_, code)| *code);
        Ok(CommandOutcome::from_code(code, ""))
    }
}

// ── Prompter ─────────────────────────────────────────────────────────────────

/// One dialog shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm(Question, String),
    Input(Question, String),
    Message(String),
    Error(String),
    Clear,
}

/// Answers from an [`Answers`] value and records every dialog.
pub struct AnswerPrompter {
    answers: Answers,
    dialogs: Mutex<Vec<Dialog>>,
}

impl AnswerPrompter {
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            dialogs: Mutex::new(Vec::new()),
        }
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.dialogs.lock().expect("lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.dialogs()
            .into_iter()
            .filter_map(|d| match d {
                Dialog::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn confirm_text(&self, question: Question) -> Option<String> {
        self.dialogs().into_iter().find_map(|d| match d {
            Dialog::Confirm(q, text) if q == question => Some(text),
            _ => None,
        })
    }

    fn record(&self, dialog: Dialog) {
        self.dialogs.lock().expect("lock").push(dialog);
    }
}

impl Prompter for AnswerPrompter {
    fn confirm(&self, question: Question, text: &str) -> Result<bool> {
        self.record(Dialog::Confirm(question, text.to_string()));
        Ok(self.answers.confirm(question))
    }

    fn input(
        &self,
        question: Question,
        text: &str,
        _initial: Option<&str>,
        validate: Option<Validator>,
    ) -> Result<Option<String>> {
        self.record(Dialog::Input(question, text.to_string()));
        let Some(value) = self.answers.input(question).filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        if let Some(validate) = validate {
            validate(value)?;
        }
        Ok(Some(value.trim().to_string()))
    }

    fn message(&self, text: &str) -> Result<()> {
        self.record(Dialog::Message(text.to_string()));
        Ok(())
    }

    fn error(&self, text: &str) -> Result<()> {
        self.record(Dialog::Error(text.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.record(Dialog::Clear);
        Ok(())
    }
}

// ── HostInfo ─────────────────────────────────────────────────────────────────

pub struct FakeHost {
    pub root: bool,
    /// `None` makes the hostname lookup fail.
    pub hostname: Option<String>,
    pub login: String,
    /// Whether the login user has a passwd entry.
    pub has_home: bool,
}

impl FakeHost {
    pub fn root() -> Self {
        Self {
            root: true,
            hostname: Some(TEMPLATE_HOSTNAME.to_string()),
            login: LOGIN.to_string(),
            has_home: true,
        }
    }

    pub fn unprivileged() -> Self {
        Self {
            root: false,
            ..Self::root()
        }
    }
}

impl HostInfo for FakeHost {
    fn is_root(&self) -> bool {
        self.root
    }

    fn hostname(&self) -> Result<String> {
        match &self.hostname {
            Some(hostname) => Ok(hostname.clone()),
            None => bail!("reading hostname: permission denied"),
        }
    }

    fn login_name(&self) -> Result<String> {
        Ok(self.login.clone())
    }

    fn home_dir(&self, user: &str) -> Result<PathBuf> {
        if !self.has_home {
            bail!("no passwd entry for user '{user}'");
        }
        Ok(PathBuf::from("/home").join(user))
    }
}

// ── KeyFetcher ───────────────────────────────────────────────────────────────

/// Serves a fixed key list for one account; every other account is unknown.
pub struct FakeKeys {
    user: String,
    keys: String,
    requests: Mutex<Vec<String>>,
}

impl FakeKeys {
    pub fn serving(user: &str, keys: &str) -> Self {
        Self {
            user: user.to_string(),
            keys: keys.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn none() -> Self {
        Self::serving("", "")
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

impl KeyFetcher for FakeKeys {
    async fn fetch_keys(&self, user: &str) -> Result<String> {
        self.requests.lock().expect("lock").push(user.to_string());
        if user == self.user {
            Ok(self.keys.clone())
        } else {
            Err(KeyFetchError::NotFound(user.to_string()).into())
        }
    }
}

// ── LocalFs ──────────────────────────────────────────────────────────────────

/// In-memory filesystem: files, directories and the last mode set per path.
#[derive(Default)]
pub struct MemoryFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    modes: Mutex<BTreeMap<PathBuf, u32>>,
}

impl MemoryFs {
    /// Add a file, creating its parent directories.
    pub fn add_file(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
    }

    pub fn add_dir(&self, path: &Path) {
        let mut dirs = self.dirs.lock().expect("lock");
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("lock").get(path).cloned()
    }

    pub fn mode(&self, path: &Path) -> Option<u32> {
        self.modes.lock().expect("lock").get(path).copied()
    }

    /// Every file and its content, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().expect("lock").clone()
    }
}

impl LocalFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().expect("lock").contains_key(path)
            || self.dirs.lock().expect("lock").contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.file(path) {
            Some(content) => Ok(content),
            None => bail!("reading file {}: not found", path.display()),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if !path.parent().is_some_and(|p| self.exists(p)) {
            bail!("writing file {}: parent missing", path.display());
        }
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> Result<()> {
        if !path.parent().is_some_and(|p| self.exists(p)) {
            bail!("opening {} for append: parent missing", path.display());
        }
        self.files
            .lock()
            .expect("lock")
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self.read_to_string(from)?;
        self.write(to, &content)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match self.files.lock().expect("lock").remove(path) {
            Some(_) => Ok(()),
            None => bail!("removing file {}: not found", path.display()),
        }
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.dirs.lock().expect("lock").contains(dir) {
            bail!("listing {}: not found", dir.display());
        }
        let mut entries: Vec<PathBuf> = self
            .files
            .lock()
            .expect("lock")
            .keys()
            .chain(self.dirs.lock().expect("lock").iter())
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        if !self.exists(path) {
            bail!("setting permissions on {}: not found", path.display());
        }
        self.modes
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), mode);
        Ok(())
    }
}

// ── ProgressReporter ─────────────────────────────────────────────────────────

/// Records progress lines as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }

    fn push(&self, kind: &str, message: &str) {
        self.lines
            .lock()
            .expect("lock")
            .push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn info(&self, message: &str) {
        self.push("info", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
}
