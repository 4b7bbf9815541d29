//! Reviewable line-level patch types.
//!
//! A [`Patch`] describes the difference between a file's previous and new
//! content as an ordered sequence of hunks. Construction lives in
//! `scribe-utils::diff`; this crate only carries the data.

use serde::{Deserialize, Serialize};

/// Kind of a single line within a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

/// One line of a hunk, without its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchLine {
    pub kind: LineKind,
    pub text: String,
}

impl PatchLine {
    #[must_use]
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A contiguous group of changed lines with surrounding context.
///
/// Line numbers are 1-indexed positions of the hunk's first line in the
/// old and new content respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchHunk {
    pub old_start: usize,
    pub new_start: usize,
    pub lines: Vec<PatchLine>,
}

/// An ordered sequence of hunks plus file identity metadata.
///
/// For an in-place edit `before_name` and `after_name` are both the file's
/// path relative to the workspace root. A patch with zero hunks is not a
/// valid success outcome; "no changes detected" is reported as an error by
/// the edit controller, never as an empty patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub before_name: String,
    pub after_name: String,
    pub hunks: Vec<PatchHunk>,
}

impl Patch {
    #[must_use]
    pub fn new(before_name: impl Into<String>, after_name: impl Into<String>) -> Self {
        Self {
            before_name: before_name.into(),
            after_name: after_name.into(),
            hunks: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Count of (added, removed) lines across all hunks.
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        let mut added = 0;
        let mut removed = 0;
        for hunk in &self.hunks {
            for line in &hunk.lines {
                match line.kind {
                    LineKind::Added => added += 1,
                    LineKind::Removed => removed += 1,
                    LineKind::Context => {}
                }
            }
        }
        (added, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_added_and_removed() {
        let mut patch = Patch::new("src/a.rs", "src/a.rs");
        patch.hunks.push(PatchHunk {
            old_start: 1,
            new_start: 1,
            lines: vec![
                PatchLine::new(LineKind::Context, "fn main() {"),
                PatchLine::new(LineKind::Removed, "    let x = 1;"),
                PatchLine::new(LineKind::Added, "    let x = 2;"),
                PatchLine::new(LineKind::Added, "    let y = 3;"),
                PatchLine::new(LineKind::Context, "}"),
            ],
        });
        assert_eq!(patch.stats(), (2, 1));
        assert!(!patch.is_empty());
    }

    #[test]
    fn fresh_patch_is_empty() {
        assert!(Patch::new("a", "a").is_empty());
        assert_eq!(Patch::new("a", "a").stats(), (0, 0));
    }
}
