//! Line-level patch generation and rendering.

use std::fmt::Write as _;

use similar::{ChangeTag, TextDiff};

use scribe_types::{LineKind, Patch, PatchHunk, PatchLine};

/// Compute a line-level patch between `original` and `edited`.
///
/// Returns `None` when the two texts are byte-identical; "no changes" is a
/// distinct outcome, never an empty patch. For an in-place edit both
/// identity names are set to the same workspace-relative `path`.
#[must_use]
pub fn create_patch(original: &str, edited: &str, path: &str) -> Option<Patch> {
    if original == edited {
        return None;
    }

    let diff = TextDiff::from_lines(original, edited);
    let mut patch = Patch::new(path, path);

    for group in diff.grouped_ops(1) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = PatchHunk {
            old_start: first.old_range().start + 1,
            new_start: first.new_range().start + 1,
            lines: Vec::new(),
        };
        for op in &group {
            for change in diff.iter_changes(op) {
                let kind = match change.tag() {
                    ChangeTag::Equal => LineKind::Context,
                    ChangeTag::Delete => LineKind::Removed,
                    ChangeTag::Insert => LineKind::Added,
                };
                hunk.lines
                    .push(PatchLine::new(kind, change.value().trim_end_matches('\n')));
            }
        }
        patch.hunks.push(hunk);
    }

    Some(patch)
}

/// Render a patch for display.
///
/// Line-numbered output with `-` for deletions and `+` for additions, and
/// `...` between hunks.
#[must_use]
pub fn render_patch(patch: &Patch) -> String {
    let max_line = patch
        .hunks
        .iter()
        .map(|h| h.old_start.max(h.new_start) + h.lines.len())
        .max()
        .unwrap_or(1);
    let width = max_line.to_string().len();

    let mut out = String::new();
    for (index, hunk) in patch.hunks.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(out, "{:>width$}", "...");
        }
        let mut old_no = hunk.old_start;
        let mut new_no = hunk.new_start;
        for line in &hunk.lines {
            match line.kind {
                LineKind::Context => {
                    let _ = writeln!(out, "{old_no:>width$}  {}", line.text);
                    old_no += 1;
                    new_no += 1;
                }
                LineKind::Removed => {
                    let _ = writeln!(out, "{old_no:>width$} -{}", line.text);
                    old_no += 1;
                }
                LineKind::Added => {
                    let _ = writeln!(out, "{new_no:>width$} +{}", line.text);
                    new_no += 1;
                }
            }
        }
    }
    out
}
