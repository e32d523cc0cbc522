//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`. All functions are
//! synchronous and take data in, returning data out.

pub mod autologin;
pub mod command;
pub mod config;
pub mod error;
pub mod hostname;
pub mod keys;
pub mod session;
pub mod sshd;
pub mod step;
pub mod sudoers;

pub use command::CommandSpec;
pub use config::{Answers, HostPaths};
pub use error::{AbortReason, KeyFetchError};
pub use session::Session;
pub use step::{FailurePolicy, Profile, Question, StepKind, StepPlan};
