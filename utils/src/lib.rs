//! Shared utilities for Scribe: text diffing and atomic file IO.

mod atomic_write;
mod diff;

pub use atomic_write::atomic_write;
pub use diff::{create_patch, render_patch};
