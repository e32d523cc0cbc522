//! Application service: the provisioning sequence.
//!
//! Presents each planned step, collects the operator's decision, runs the
//! matching action and applies the step's failure policy. Control is strictly
//! linear: pre-flight gates, then the plan in order, then the final dialog.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::application::ports::{
    CommandRunner, HostInfo, KeyFetcher, LocalFs, ProgressReporter, Prompter,
};
use crate::application::services::actions::{self, StepOutcome};
use crate::domain::hostname::validate_hostname;
use crate::domain::keys::{is_empty_key_list, validate_username};
use crate::domain::step::CONSENT_PROMPT;
use crate::domain::{
    AbortReason, FailurePolicy, HostPaths, Question, Session, StepKind, StepPlan,
};

/// Final dialog text.
pub const DONE_MESSAGE: &str = "Done";

/// The collaborators one run talks to.
pub struct Ports<'a, R, P, H, K, F, O> {
    pub runner: &'a R,
    pub prompter: &'a P,
    pub host: &'a H,
    pub keys: &'a K,
    pub fs: &'a F,
    pub reporter: &'a O,
}

/// How a provisioning run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every planned step was offered and the final dialog acknowledged.
    Completed,
    /// A reboot was issued; nothing runs after it.
    Rebooting,
    /// The run stopped early.
    Aborted(AbortReason),
}

impl RunOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed | RunOutcome::Rebooting => 0,
            RunOutcome::Aborted(_) => 1,
        }
    }
}

/// Run the whole provisioning sequence.
///
/// Declining the consent gate or lacking root privileges returns
/// `RunOutcome::Aborted` before any step is offered. A failed fatal step shows
/// the error, clears the screen and aborts; a failed non-fatal step shows the
/// error and the run moves on.
///
/// # Errors
///
/// Returns an error if a dialog cannot be shown or the login name cannot be
/// determined.
pub async fn run_provisioning<R, P, H, K, F, O>(
    ports: &Ports<'_, R, P, H, K, F, O>,
    plan: &StepPlan,
    paths: &HostPaths,
) -> Result<RunOutcome>
where
    R: CommandRunner,
    P: Prompter,
    H: HostInfo,
    K: KeyFetcher,
    F: LocalFs,
    O: ProgressReporter,
{
    if !ports.prompter.confirm(Question::Consent, CONSENT_PROMPT)? {
        return abort(ports.prompter, AbortReason::ConsentDeclined);
    }
    if !ports.host.is_root() {
        return abort(ports.prompter, AbortReason::NotRoot);
    }

    let mut session = Session::new(ports.host.login_name()?);
    debug!(login = %session.login, steps = ?plan.steps(), "provisioning session started");

    for &step in plan.steps() {
        let Some(outcome) = run_step(ports, step, &mut session, paths).await? else {
            ports.reporter.info(step.declined_message());
            continue;
        };

        match outcome {
            StepOutcome::Applied => {
                info!(?step, "step applied");
                ports.reporter.success(step.done_message());
                if step == StepKind::Reboot {
                    return Ok(RunOutcome::Rebooting);
                }
            }
            StepOutcome::AlreadyApplied => {
                ports
                    .reporter
                    .info(&format!("{} (already in place)", step.done_message()));
            }
            StepOutcome::Failed(message) => {
                warn!(?step, %message, "step failed");
                ports.prompter.error(&message)?;
                if step.failure_policy() == FailurePolicy::Fatal {
                    return abort(ports.prompter, AbortReason::StepFailed { step, message });
                }
            }
        }
    }

    ports.prompter.message(DONE_MESSAGE)?;
    ports.prompter.clear()?;
    Ok(RunOutcome::Completed)
}

/// Gate and run one step. `Ok(None)` means the operator declined it.
async fn run_step<R, P, H, K, F, O>(
    ports: &Ports<'_, R, P, H, K, F, O>,
    step: StepKind,
    session: &mut Session,
    paths: &HostPaths,
) -> Result<Option<StepOutcome>>
where
    R: CommandRunner,
    P: Prompter,
    H: HostInfo,
    K: KeyFetcher,
    F: LocalFs,
    O: ProgressReporter,
{
    match step {
        StepKind::Hostname => hostname_step(ports, session).await,
        StepKind::GithubKeys => keys_step(ports, session).await,
        _ => {
            if !ports
                .prompter
                .confirm(Question::Step(step), &step.prompt(&session.login))?
            {
                return Ok(None);
            }
            ports.reporter.step(step.accepted_message());
            let result = match step {
                StepKind::Update => actions::update_system(ports.runner).await,
                StepKind::PasswordlessSudo => actions::grant_passwordless_sudo(ports.fs, paths),
                StepKind::AdminGroup => {
                    actions::join_admin_group(ports.runner, &session.login).await
                }
                StepKind::HardenSshd => actions::harden_sshd(ports.fs, paths),
                StepKind::Autologin => {
                    actions::enable_autologin(ports.fs, paths, &session.login)
                }
                StepKind::ResetHostKeys => {
                    actions::reset_host_keys(ports.runner, ports.fs, paths).await
                }
                StepKind::RemoveScript => actions::remove_self(ports.fs, paths),
                StepKind::Reboot => actions::reboot(ports.runner).await,
                StepKind::Hostname | StepKind::GithubKeys => unreachable!("handled above"),
            };
            Ok(Some(settle(result)))
        }
    }
}

/// The hostname input is its own gate: an unchanged, empty or declined value
/// skips the step.
async fn hostname_step<R, P, H, K, F, O>(
    ports: &Ports<'_, R, P, H, K, F, O>,
    session: &mut Session,
) -> Result<Option<StepOutcome>>
where
    R: CommandRunner,
    P: Prompter,
    H: HostInfo,
    O: ProgressReporter,
{
    let current = match ports.host.hostname() {
        Ok(current) => current,
        Err(e) => {
            return Ok(Some(StepOutcome::Failed(format!(
                "Error reading current hostname: {e:#}"
            ))));
        }
    };
    let answer = ports.prompter.input(
        Question::Hostname,
        &StepKind::Hostname.prompt(&session.login),
        Some(&current),
        Some(validate_hostname),
    )?;
    let Some(hostname) = answer.map(|h| h.trim().to_string()) else {
        return Ok(None);
    };
    if hostname.is_empty() || hostname == current {
        return Ok(None);
    }

    ports
        .reporter
        .step(&format!("setting hostname to \"{hostname}\""));
    let outcome = settle(actions::set_hostname(ports.runner, &hostname).await);
    if outcome == StepOutcome::Applied {
        session.hostname = Some(hostname);
    }
    Ok(Some(outcome))
}

/// Ask for an account, fetch its keys, show them, and only write after a
/// second confirmation.
async fn keys_step<R, P, H, K, F, O>(
    ports: &Ports<'_, R, P, H, K, F, O>,
    session: &mut Session,
) -> Result<Option<StepOutcome>>
where
    R: CommandRunner,
    P: Prompter,
    H: HostInfo,
    K: KeyFetcher,
    F: LocalFs,
    O: ProgressReporter,
{
    let step = StepKind::GithubKeys;
    if !ports
        .prompter
        .confirm(Question::Step(step), &step.prompt(&session.login))?
    {
        return Ok(None);
    }
    let Some(user) = ports.prompter.input(
        Question::KeysUser,
        "Github Username",
        None,
        Some(validate_username),
    )?
    else {
        return Ok(None);
    };

    ports
        .reporter
        .step(&format!("Fetching public keys for '{user}'"));
    let keys = match ports.keys.fetch_keys(&user).await {
        Ok(keys) => keys,
        Err(e) => {
            return Ok(Some(StepOutcome::Failed(format!(
                "Error fetching keys for '{user}': {e:#}"
            ))));
        }
    };
    if is_empty_key_list(&keys) {
        ports
            .reporter
            .warn(&format!("No public keys published for '{user}'"));
        return Ok(None);
    }

    let confirmation = format!(
        "Are you sure to add these keys to user {}?\n\n{keys}",
        session.login
    );
    if !ports.prompter.confirm(Question::KeysConfirm, &confirmation)? {
        return Ok(None);
    }

    ports.reporter.step(step.accepted_message());
    let outcome = match ports.host.home_dir(&session.login) {
        Ok(home) => settle(
            actions::install_authorized_keys(ports.runner, ports.fs, &session.login, &home, &keys)
                .await,
        ),
        Err(e) => StepOutcome::Failed(format!("{e:#}")),
    };
    if outcome == StepOutcome::Applied {
        session.keys = Some(keys);
    }
    Ok(Some(outcome))
}

fn abort(prompter: &impl Prompter, reason: AbortReason) -> Result<RunOutcome> {
    if reason.clears_screen() {
        prompter.clear()?;
    }
    Ok(RunOutcome::Aborted(reason))
}

/// Infrastructure errors inside an action count as that step failing.
fn settle(result: Result<StepOutcome>) -> StepOutcome {
    result.unwrap_or_else(|e| StepOutcome::Failed(format!("{e:#}")))
}
