//! Stylesheet for provisioning output and dialogs.

use owo_colors::{OwoColorize as _, Style};

/// Heading of the dialog shown when a step fails.
pub const ERROR_TITLE: &str = "An error occurred!";

/// One style per kind of line a run prints. Plain unless built with
/// [`Styles::colored`].
#[derive(Debug, Default, Clone)]
pub struct Styles {
    /// The run banner.
    pub banner: Style,
    /// A step the operator accepted.
    pub running: Style,
    /// A step that finished.
    pub done: Style,
    /// Declined or skipped steps.
    pub skipped: Style,
    pub warning: Style,
    pub error: Style,
    /// Keyboard hints under dialogs.
    pub hint: Style,
}

impl Styles {
    #[must_use]
    pub fn colored() -> Self {
        Self {
            banner: Style::new().bold().underline(),
            running: Style::new().bold().cyan(),
            done: Style::new().green(),
            skipped: Style::new().dimmed(),
            warning: Style::new().yellow(),
            error: Style::new().bold().red(),
            hint: Style::new().dimmed().italic(),
        }
    }

    /// The error dialog heading.
    #[must_use]
    pub fn error_title(&self) -> String {
        ERROR_TITLE.style(self.error).to_string()
    }

    #[must_use]
    pub fn hint(&self, text: &str) -> String {
        text.style(self.hint).to_string()
    }
}
