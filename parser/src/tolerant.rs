//! Tolerant strategy: permissive pattern matching over a YAML-ish input.
//!
//! Recovers `target_file`, `instructions` and `code_edit` from input that
//! nominally targets YAML but violates it (inconsistent quoting, raw
//! newlines inside quoted scalars). Block-style `code_edit: |` bodies are
//! taken verbatim; quoted bodies get basic escape resolution.

use regex::Regex;
use scribe_types::EditRequest;

/// How the `code_edit` body was matched. The tag decides escape handling
/// downstream, so it is carried with the match instead of re-derived.
enum CodeEditMatch {
    /// Block-scalar body, preserved verbatim (embedded quotes included).
    Block(String),
    /// Quoted body, `\n`/`\"`/`\'` already resolved.
    Quoted(String),
}

impl CodeEditMatch {
    fn into_text(self) -> String {
        match self {
            Self::Block(text) | Self::Quoted(text) => text,
        }
    }
}

pub fn parse(content: &str) -> Option<EditRequest> {
    let target_re = Regex::new(r#"target_file\s*:\s*["']?([^"'\n]+)["']?"#).ok()?;
    let instructions_re = Regex::new(r#"instructions\s*:\s*["']?([^"'\n]*)["']?"#).ok()?;

    let target_file = target_re.captures(content)?.get(1)?.as_str().trim();
    if target_file.is_empty() {
        return None;
    }
    let code_edit = find_code_edit(content)?;
    let instructions = instructions_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(EditRequest::new(
        target_file,
        instructions,
        code_edit.into_text(),
    ))
}

/// Block style takes precedence over quoted style: it is the only form
/// that preserves embedded quotes and newlines without escape damage.
fn find_code_edit(content: &str) -> Option<CodeEditMatch> {
    if let Some(body) = find_block_scalar(content) {
        return Some(CodeEditMatch::Block(body));
    }

    let quoted_re = Regex::new(r#"(?s)code_edit\s*:\s*["'](.*?)["']"#).ok()?;
    let raw = quoted_re.captures(content)?.get(1)?.as_str();
    let resolved = raw
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\'", "'");
    Some(CodeEditMatch::Quoted(resolved))
}

/// Extract the indented block following `code_edit: |`.
///
/// The block runs until the first line that is neither blank nor indented,
/// i.e. until a new top-level key. Indentation is kept as written; trailing
/// blank space is trimmed.
fn find_block_scalar(content: &str) -> Option<String> {
    let header_re = Regex::new(r"code_edit\s*:\s*\|[ \t]*\r?\n").ok()?;
    let header = header_re.find(content)?;

    let mut lines: Vec<&str> = Vec::new();
    for line in content[header.end()..].lines() {
        if line.trim().is_empty() || line.starts_with(' ') || line.starts_with('\t') {
            lines.push(line);
        } else {
            break;
        }
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n").trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn block_scalar_preserves_embedded_quotes_verbatim() {
        let input = concat!(
            "target_file: src/greet.ts\n",
            "instructions: add greeting\n",
            "code_edit: |\n",
            "  console.log(\"hello \\\"world\\\"\");\n",
            "  console.log('done');\n",
        );
        let req = parse(input).expect("tolerant match");
        assert_eq!(req.target_file, "src/greet.ts");
        assert_eq!(req.instructions, "add greeting");
        // No escape processing on block style: backslashes stay as written.
        assert_eq!(
            req.code_edit,
            "  console.log(\"hello \\\"world\\\"\");\n  console.log('done');"
        );
    }

    #[test]
    fn block_scalar_keeps_interior_blank_lines() {
        let input = concat!(
            "target_file: a.py\n",
            "code_edit: |\n",
            "  def a():\n",
            "      pass\n",
            "\n",
            "  def b():\n",
            "      pass\n",
            "next_key: value\n",
        );
        let req = parse(input).expect("tolerant match");
        assert_eq!(
            req.code_edit,
            "  def a():\n      pass\n\n  def b():\n      pass"
        );
    }

    #[test]
    fn block_scalar_stops_at_next_top_level_key() {
        let input = "target_file: a.rs\ncode_edit: |\n  fn main() {}\nother: thing\n";
        let req = parse(input).expect("tolerant match");
        assert_eq!(req.code_edit, "  fn main() {}");
    }

    #[test]
    fn quoted_value_resolves_basic_escapes() {
        let input = "target_file: 'a.rs'\ncode_edit: \"line one\\nline two\"";
        let req = parse(input).expect("tolerant match");
        assert_eq!(req.code_edit, "line one\nline two");
    }

    #[test]
    fn quoted_value_spanning_raw_newlines_is_captured() {
        // Invalid YAML (unescaped newline in a quoted scalar at column 0)
        // but the permissive pattern still recovers the body.
        let input = "target_file: a.rs\ncode_edit: \"fn main() {\nprintln!();\n}\"";
        let req = parse(input).expect("tolerant match");
        assert_eq!(req.code_edit, "fn main() {\nprintln!();\n}");
    }

    #[test]
    fn requires_target_file_and_code_edit() {
        assert!(parse("instructions: do it\ncode_edit: \"x\"").is_none());
        assert!(parse("target_file: a.rs\ninstructions: do it").is_none());
    }

    #[test]
    fn instructions_are_optional() {
        let req = parse("target_file: a.rs\ncode_edit: \"x\"").expect("match");
        assert_eq!(req.instructions, "");
    }
}
