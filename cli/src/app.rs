//! Application context: wires the production adapters to the sequencer.
//!
//! `AppContext` is built once from the parsed command line and owns the
//! output context, the step plan and the host paths for the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{Ports, Prompter, RunOutcome, run_provisioning};
use crate::domain::step::BACKGROUND_TITLE;
use crate::domain::{Answers, HostPaths, Profile, StepKind, StepPlan};
use crate::infra::answers::load_answers;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::HostFs;
use crate::infra::host::SystemHost;
use crate::infra::keys::HttpKeyFetcher;
use crate::infra::prompt::{DialogPrompter, ScriptedPrompter};
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub profile: Profile,
    pub skip: Vec<StepKind>,
    pub answers: Option<PathBuf>,
    pub keys_url: String,
    pub profile_dir: Option<PathBuf>,
    pub quiet: bool,
    pub no_color: bool,
}

/// Unified state for one provisioning run.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Steps offered during this run, in order.
    pub plan: StepPlan,
    /// Files the steps touch.
    pub paths: HostPaths,
    /// Base URL for public key lookups.
    pub keys_url: String,
    /// Scripted answers; `None` means interactive dialogs.
    pub answers: Option<Answers>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers file is unreadable or invalid, or if
    /// the current directory or executable path cannot be resolved.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let answers = flags.answers.as_deref().map(load_answers).transpose()?;

        let profile_dir = match flags.profile_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("resolving current directory")?,
        };
        let script = std::env::current_exe().context("resolving own executable path")?;

        let plan = StepPlan::new(flags.profile, &flags.skip);
        debug!(profile = ?flags.profile, steps = ?plan.steps(), "step plan built");

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            plan,
            paths: HostPaths::system(&profile_dir, script),
            keys_url: flags.keys_url,
            answers,
        })
    }

    /// Run provisioning with the prompter matching the mode.
    ///
    /// # Errors
    ///
    /// Returns an error if an interactive run has no terminal, or propagates
    /// unexpected failures from the run.
    pub async fn provision(&self) -> Result<RunOutcome> {
        self.output.banner(BACKGROUND_TITLE);
        let outcome = match &self.answers {
            Some(answers) => self.provision_with(&ScriptedPrompter::new(answers.clone())).await?,
            None => {
                anyhow::ensure!(
                    self.output.is_tty,
                    "interactive provisioning needs a terminal; use --answers for unattended runs"
                );
                self.provision_with(&DialogPrompter::new(self.output.styles.clone()))
                    .await?
            }
        };
        if let RunOutcome::Aborted(reason) = &outcome {
            self.output.abort(reason);
        }
        Ok(outcome)
    }

    async fn provision_with<P: Prompter>(&self, prompter: &P) -> Result<RunOutcome> {
        let runner = TokioCommandRunner::new(!self.output.quiet);
        let keys = HttpKeyFetcher::new(self.keys_url.clone());
        let ports = Ports {
            runner: &runner,
            prompter,
            host: &SystemHost,
            keys: &keys,
            fs: &HostFs,
            reporter: &self.output,
        };
        run_provisioning(&ports, &self.plan, &self.paths).await
    }
}
