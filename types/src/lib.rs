//! Core domain types for Scribe.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application.

mod edit;
mod error;
mod patch;
mod process;

pub use edit::{EditRequest, EditResult};
pub use error::{EditError, ExecError};
pub use patch::{LineKind, Patch, PatchHunk, PatchLine};
pub use process::ProcessExecutorResult;
