//! Terminal output for a provisioning run.
//!
//! `OutputContext` renders the banner, one tagged line per step event and
//! the abort notice. It is also the sequencer's `ProgressReporter`.

pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use styles::{ERROR_TITLE, Styles};

use crate::application::ports::ProgressReporter;
use crate::domain::AbortReason;

/// Styling and terminal state for one run.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a terminal. Interactive dialogs need one.
    pub is_tty: bool,
    /// Suppress everything but errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal and never with `--no-color`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let styles = if is_tty && !no_color {
            Styles::colored()
        } else {
            Styles::default()
        };
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print the run banner. Suppressed when `quiet`.
    pub fn banner(&self, title: &str) {
        if !self.quiet {
            println!("{}", title.style(self.styles.banner));
        }
    }

    /// Print an error line to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.tagged("fail", self.styles.error, msg));
    }

    /// Print why the run stopped early.
    pub fn abort(&self, reason: &AbortReason) {
        self.error(&abort_notice(reason));
    }

    fn tagged(&self, tag: &str, style: Style, msg: &str) -> String {
        format!("[{}] {msg}", format!("{tag:^4}").style(style))
    }

    fn print(&self, tag: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("{}", self.tagged(tag, style, msg));
        }
    }
}

impl ProgressReporter for OutputContext {
    fn step(&self, message: &str) {
        self.print("..", self.styles.running, message);
    }

    fn success(&self, message: &str) {
        self.print("ok", self.styles.done, message);
    }

    fn info(&self, message: &str) {
        self.print("--", self.styles.skipped, message);
    }

    fn warn(&self, message: &str) {
        self.print("warn", self.styles.warning, message);
    }
}

/// The one-line notice for an aborted run. A failed step's own error was
/// already shown in its dialog, so only the step name is repeated.
#[must_use]
pub fn abort_notice(reason: &AbortReason) -> String {
    match reason {
        AbortReason::StepFailed { step, .. } => format!("Abort! ({step} failed)"),
        other => other.to_string(),
    }
}
