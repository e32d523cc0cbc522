//! Application services: use-case orchestration.
//!
//! Each service module composes domain logic with port trait calls. Services
//! import only from `crate::domain` and `crate::application::ports`, never
//! from `crate::infra` or `crate::output`.

pub mod actions;
pub mod sequencer;
