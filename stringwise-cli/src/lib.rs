//! Caller-side plumbing for the `stringwise` binary: project files in,
//! logged engine calls, JSON reports out.
//!
//! The engine itself never logs; everything observable happens here through
//! [`Component::inspect`](stringwise_core::Component::inspect).

pub mod project;
mod run;

pub use project::{Job, Project, ProjectError};
pub use run::{Report, run};
