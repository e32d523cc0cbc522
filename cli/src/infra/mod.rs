//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, host facts, key fetching, and terminal prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! `prompt` additionally borrows the stylesheet from `crate::output`.

pub mod answers;
pub mod command_runner;
pub mod fs;
pub mod host;
pub mod keys;
pub mod prompt;
