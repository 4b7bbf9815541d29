//! Legacy strategy: loose key/value anchors plus escape-aware scanning.
//!
//! Accepts `:` or `=` separators and single or double quotes. The
//! `code_edit` body is extracted with [`crate::scanner::scan_quoted`],
//! which is the only path that handles arbitrarily nested escaped quotes
//! correctly, at the cost of requiring an exact key/quote anchor.

use regex::Regex;
use scribe_types::EditRequest;

use crate::scanner::scan_quoted;

pub fn parse(content: &str) -> Option<EditRequest> {
    let target_re = Regex::new(r#"target_file["\s]*[:=]["\s]*["']([^"']+)["']"#).ok()?;
    let instructions_re = Regex::new(r#"(?s)instructions["\s]*[:=]["\s]*["']([^"']*?)["']"#).ok()?;

    let target_file = target_re.captures(content)?.get(1)?.as_str();
    let code_edit = extract_code_edit(content)?;
    let instructions = instructions_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(EditRequest::new(target_file, instructions, code_edit))
}

/// Anchor at the first quote following the `code_edit` key and scan to the
/// matching unescaped close quote.
fn extract_code_edit(content: &str) -> Option<String> {
    let anchor_re = Regex::new(r#"code_edit["\s]*[:=]["\s]*["']"#).ok()?;
    let anchor = anchor_re.find(content)?;

    let start = anchor.end();
    let opening_quote = content[anchor.start()..start].chars().next_back()?;
    scan_quoted(content, start, opening_quote)
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn scanner_reconstructs_nested_quotes_and_newlines() {
        let input = concat!(
            "target_file = 'src/log.ts'\n",
            "instructions = 'add logging'\n",
            "code_edit = 'console.log(\\'start\\');\\nconsole.log(\"done\");'\n",
        );
        let req = parse(input).expect("legacy match");
        assert_eq!(req.target_file, "src/log.ts");
        assert_eq!(req.instructions, "add logging");
        assert_eq!(
            req.code_edit,
            "console.log('start');\nconsole.log(\"done\");"
        );
    }

    #[test]
    fn escaped_newlines_become_literal_newlines() {
        let input = r#"target_file: "a.rs" code_edit: "fn main() {\n    run();\n}""#;
        let req = parse(input).expect("legacy match");
        assert_eq!(req.code_edit, "fn main() {\n    run();\n}");
    }

    #[test]
    fn accepts_equals_separator_and_mixed_quotes() {
        let input = r#"target_file="a.rs" code_edit='x'"#;
        let req = parse(input).expect("legacy match");
        assert_eq!(req.target_file, "a.rs");
        assert_eq!(req.code_edit, "x");
        assert_eq!(req.instructions, "");
    }

    #[test]
    fn unterminated_code_edit_is_none() {
        assert!(parse(r#"target_file: "a.rs" code_edit: "never closed"#).is_none());
    }

    #[test]
    fn requires_quoted_target_file() {
        assert!(parse(r#"target_file: a.rs code_edit: "x""#).is_none());
    }
}
