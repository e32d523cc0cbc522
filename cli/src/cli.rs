//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};

use crate::app::{AppContext, AppFlags};
use crate::application::RunOutcome;
use crate::domain::keys::DEFAULT_KEYS_URL;
use crate::domain::{Profile, StepKind};

/// First-boot provisioning for VMs cloned from a template
#[derive(Parser)]
#[command(name = "firstboot", version)]
pub struct Cli {
    /// Step selection to offer
    #[arg(long, default_value = "full", value_parser = profile_parser())]
    pub profile: Profile,

    /// Leave a step out of the run (repeatable)
    #[arg(long, value_name = "STEP", value_parser = step_parser())]
    pub skip: Vec<StepKind>,

    /// Answer every prompt from a YAML file instead of the terminal
    #[arg(long, value_name = "FILE", env = "FIRSTBOOT_ANSWERS")]
    pub answers: Option<PathBuf>,

    /// Base URL public keys are fetched from (`<URL>/<user>.keys`)
    #[arg(long, value_name = "URL", env = "FIRSTBOOT_KEYS_URL", default_value = DEFAULT_KEYS_URL)]
    pub keys_url: String,

    /// Directory holding `.profile` and `.profile.original` [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

fn profile_parser() -> impl TypedValueParser<Value = Profile> {
    PossibleValuesParser::new(Profile::ALL.map(Profile::name)).XX
}

fn step_parser() -> impl TypedValueParser<Value = StepKind> {
    PossibleValuesParser::new(StepKind::ALL.map(StepKind::name)).XX
}

impl Cli {
    /// Execute the provisioning run.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers file cannot be loaded, the working
    /// directory cannot be resolved, or the run itself fails unexpectedly.
    pub async fn run(self) -> Result<RunOutcome> {
        let Cli {
            profile,
            skip,
            answers,
            keys_url,
            profile_dir,
            quiet,
            no_color,
        } = self;
        let app = AppContext::new(AppFlags {
            profile,
            skip,
            answers,
            keys_url,
            profile_dir,
            quiet,
            no_color,
        })?;
        app.provision().await
    }
}
