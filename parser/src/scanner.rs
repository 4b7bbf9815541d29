//! Escape-aware quote scanning.

/// Scan forward from `start` (the byte offset immediately after an opening
/// quote) to the matching unescaped closing quote, resolving escape
/// sequences in the extracted body.
///
/// A backslash consumes the following character unconditionally, so an
/// escaped quote never terminates the scan. Returns `None` when the string
/// is unterminated. Single forward pass, no backtracking.
pub fn scan_quoted(content: &str, start: usize, quote: char) -> Option<String> {
    if !quote.is_ascii() || start > content.len() {
        return None;
    }
    let bytes = content.as_bytes();
    let quote = quote as u8;

    let mut escape_next = false;
    let mut index = start;
    while index < bytes.len() {
        let byte = bytes[index];
        if escape_next {
            escape_next = false;
        } else if byte == b'\\' {
            escape_next = true;
        } else if byte == quote {
            return Some(resolve_escapes(&content[start..index]));
        }
        index += 1;
    }
    None
}

/// Resolve `\n`, `\"`, `\'` and `\\` to their literal characters.
///
/// Unrecognized escapes are kept verbatim, backslash included.
pub fn resolve_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{resolve_escapes, scan_quoted};

    #[test]
    fn finds_matching_close_quote() {
        let content = r#"code_edit: "let x = 1;" trailing"#;
        let start = content.find('"').unwrap() + 1;
        assert_eq!(
            scan_quoted(content, start, '"'),
            Some("let x = 1;".to_string())
        );
    }

    #[test]
    fn escaped_quote_does_not_end_the_scan() {
        let content = r#""say \"hi\" twice""#;
        assert_eq!(
            scan_quoted(content, 1, '"'),
            Some(r#"say "hi" twice"#.to_string())
        );
    }

    #[test]
    fn backslash_consumes_any_next_character() {
        // A backslash before the quote character itself must not terminate.
        let content = r"'it\'s fine'";
        assert_eq!(scan_quoted(content, 1, '\''), Some("it's fine".to_string()));
    }

    #[test]
    fn unterminated_string_is_none() {
        assert_eq!(scan_quoted(r#""no closing quote"#, 1, '"'), None);
        assert_eq!(scan_quoted(r#""ends in escape\"#, 1, '"'), None);
    }

    #[test]
    fn resolves_all_four_escapes() {
        assert_eq!(
            resolve_escapes(r#"a\nb\"c\'d\\e"#),
            "a\nb\"c'd\\e".to_string()
        );
    }

    #[test]
    fn keeps_unknown_escapes_verbatim() {
        assert_eq!(resolve_escapes(r"a\tb"), r"a\tb");
    }

    #[test]
    fn multibyte_content_survives_the_scan() {
        let content = "\"héllo wörld\"";
        assert_eq!(scan_quoted(content, 1, '"'), Some("héllo wörld".to_string()));
    }
}
