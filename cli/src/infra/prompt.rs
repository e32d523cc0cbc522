//! Prompt implementations of the `Prompter` port.
//!
//! `DialogPrompter` drives the operator's terminal with `dialoguer` and
//! `console`; `ScriptedPrompter` answers from an answers file for unattended
//! runs.

use anyhow::{Context, Result};
use console::Term;
use dialoguer::{Confirm, Input};

use crate::application::ports::{Prompter, Validator};
use crate::domain::{Answers, Question};
use crate::output::{ERROR_TITLE, Styles};

// ── Interactive ──────────────────────────────────────────────────────────────

/// Interactive terminal dialogs.
pub struct DialogPrompter {
    term: Term,
    styles: Styles,
}

impl DialogPrompter {
    #[must_use]
    pub fn new(styles: Styles) -> Self {
        Self {
            term: Term::stdout(),
            styles,
        }
    }

    fn acknowledge(&self) -> Result<()> {
        self.term.write_line(&self.styles.hint("Press any key to continue"))?;
        self.term.read_key()?;
        Ok(())
    }
}

impl Prompter for DialogPrompter {
    fn confirm(&self, _question: Question, text: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(text)
            .default(false)
            .interact_opt()?;
        Ok(answer.unwrap_or(false))
    }

    fn input(
        &self,
        _question: Question,
        text: &str,
        initial: Option<&str>,
        validate: Option<Validator>,
    ) -> Result<Option<String>> {
        let mut input = Input::<String>::new()
            .with_prompt(format!("{text} (leave empty to skip)"))
            .allow_empty(true);
        if let Some(initial) = initial {
            input = input.with_initial_text(initial);
        }
        if let Some(validate) = validate {
            input = input.validate_with(move |value: &String| -> Result<(), String> {
                let value = value.trim();
                if value.is_empty() {
                    return Ok(());
                }
                validate(value).map_err(|e| e.to_string())
            });
        }
        let value = input.interact_text()?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn message(&self, text: &str) -> Result<()> {
        self.term.write_line("")?;
        self.term.write_line(text)?;
        self.acknowledge()
    }

    fn error(&self, text: &str) -> Result<()> {
        self.term.write_line("")?;
        self.term.write_line(&self.styles.error_title())?;
        self.term.write_line(text)?;
        self.acknowledge()
    }

    fn clear(&self) -> Result<()> {
        if self.term.is_term() {
            self.term.clear_screen()?;
        }
        Ok(())
    }
}

// ── Scripted ─────────────────────────────────────────────────────────────────

/// Answers every prompt from an [`Answers`] file and never waits.
///
/// Each question is echoed with the answer it received.
pub struct ScriptedPrompter {
    answers: Answers,
    out: Term,
    err: Term,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: Question, text: &str) -> Result<bool> {
        let answer = self.answers.confirm(question);
        self.out
            .write_line(&format!("{text} [{}]", if answer { "yes" } else { "no" }))?;
        Ok(answer)
    }

    fn input(
        &self,
        question: Question,
        text: &str,
        _initial: Option<&str>,
        validate: Option<Validator>,
    ) -> Result<Option<String>> {
        let Some(value) = self
            .answers
            .input(question)
            .map(str::trim)
            .filter(|v| !v.is_empty())
        else {
            self.out.write_line(&format!("{text} [skipped]"))?;
            return Ok(None);
        };
        if let Some(validate) = validate {
            validate(value).with_context(|| format!("invalid scripted answer for '{text}'"))?;
        }
        self.out.write_line(&format!("{text} [{value}]"))?;
        Ok(Some(value.to_string()))
    }

    fn message(&self, text: &str) -> Result<()> {
        self.out.write_line(text)?;
        Ok(())
    }

    fn error(&self, text: &str) -> Result<()> {
        self.err.write_line(&format!("{ERROR_TITLE} {text}"))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }
}
