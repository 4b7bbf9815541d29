//! Overlay merge of edit text onto original file content.
//!
//! The edit text is authoritative for the regions it specifies. Bodies may
//! elide unchanged regions with marker lines (`// ... existing code ...`,
//! `# ... existing code ...`, or a bare `...`); the literal segments
//! between markers are anchored in the original and the elided regions are
//! carried over unchanged. An edit without markers replaces the whole
//! file.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MergeError(pub String);

/// Seam for the merge algorithm. The edit controller only requires "given
/// original and edit text, produce new full-text content".
pub trait EditApplier: Send + Sync {
    fn apply(&self, original: &str, edit: &str) -> Result<String, MergeError>;
}

/// Default marker-aware overlay merge.
#[derive(Debug, Default)]
pub struct OverlayMerge;

impl EditApplier for OverlayMerge {
    fn apply(&self, original: &str, edit: &str) -> Result<String, MergeError> {
        if !edit.lines().any(is_elision_marker) {
            return Ok(edit.to_string());
        }

        let original_lines: Vec<&str> = original.lines().collect();
        let mut out: Vec<&str> = Vec::new();
        let mut cursor = 0usize;
        let mut elide_pending = false;

        for segment in segments(edit) {
            match segment {
                Item::Marker => elide_pending = true,
                Item::Segment(lines) => {
                    let Some(first) = lines.iter().find(|l| !l.trim().is_empty()) else {
                        out.extend(&lines);
                        continue;
                    };
                    let Some(start) = find_line(&original_lines, cursor, first.trim()) else {
                        return Err(MergeError(format!(
                            "could not anchor edit segment starting with {:?}",
                            first.trim()
                        )));
                    };
                    if elide_pending {
                        out.extend(&original_lines[cursor..start]);
                    }
                    let last = lines
                        .iter()
                        .rev()
                        .find(|l| !l.trim().is_empty())
                        .map_or(*first, |l| l);
                    let end = if lines.len() == 1 {
                        Some(start)
                    } else {
                        find_line(&original_lines, start + 1, last.trim())
                    };
                    out.extend(&lines);
                    cursor = end.map_or_else(
                        || (start + lines.len()).min(original_lines.len()),
                        |j| j + 1,
                    );
                    elide_pending = false;
                }
            }
        }
        if elide_pending {
            out.extend(&original_lines[cursor..]);
        }

        let mut merged = out.join("\n");
        if original.ends_with('\n') && !merged.is_empty() {
            merged.push('\n');
        }
        Ok(merged)
    }
}

enum Item<'a> {
    Marker,
    Segment(Vec<&'a str>),
}

fn segments(edit: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in edit.lines() {
        if is_elision_marker(line) {
            if !current.is_empty() {
                items.push(Item::Segment(std::mem::take(&mut current)));
            }
            items.push(Item::Marker);
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        items.push(Item::Segment(current));
    }
    items
}

fn is_elision_marker(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "..." || trimmed.contains("... existing code ...")
}

fn find_line(lines: &[&str], from: usize, needle: &str) -> Option<usize> {
    lines
        .iter()
        .skip(from)
        .position(|l| l.trim() == needle)
        .map(|p| p + from)
}
