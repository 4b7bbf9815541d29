//! Strict strategy: the input is a well-formed YAML mapping.

use scribe_types::EditRequest;
use serde_yaml::Value;

/// Interpret the whole input as a YAML document with `target_file`,
/// `instructions` and `code_edit` keys.
///
/// Any structural failure (not valid YAML, not a mapping, wrong value
/// types) yields `None` so the cascade can continue; nothing propagates.
pub fn parse(content: &str) -> Option<EditRequest> {
    let doc: Value = serde_yaml::from_str(content).ok()?;
    doc.as_mapping()?;

    let target_file = doc.get("target_file")?.as_str()?;
    if target_file.trim().is_empty() {
        return None;
    }
    let code_edit = doc.get("code_edit")?.as_str()?;
    let instructions = doc
        .get("instructions")
        .and_then(Value::as_str)
        .unwrap_or("");

    Some(EditRequest::new(target_file, instructions, code_edit))
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn parses_block_scalar_with_proper_dedent() {
        let input = "target_file: \"src/a.ts\"\ninstructions: \"rename var\"\ncode_edit: |\n  let x = 1;\n";
        let req = parse(input).expect("well-formed yaml");
        assert_eq!(req.target_file, "src/a.ts");
        assert_eq!(req.instructions, "rename var");
        assert_eq!(req.code_edit, "let x = 1;\n");
    }

    #[test]
    fn missing_instructions_defaults_to_empty() {
        let req = parse("target_file: a.rs\ncode_edit: \"x\"\n").expect("valid");
        assert_eq!(req.instructions, "");
    }

    #[test]
    fn missing_required_keys_is_none() {
        assert!(parse("target_file: a.rs\n").is_none());
        assert!(parse("code_edit: \"x\"\n").is_none());
    }

    #[test]
    fn non_mapping_documents_are_none() {
        assert!(parse("just a sentence").is_none());
        assert!(parse("- a\n- b\n").is_none());
    }

    #[test]
    fn malformed_yaml_is_swallowed_not_propagated() {
        // Unescaped nested quotes are a hard YAML error, not a clean miss.
        let input = "target_file: \"a.rs\"\ncode_edit: \"let x = \"oops\";\"\n";
        assert!(parse(input).is_none());
    }

    #[test]
    fn empty_target_file_is_invalid() {
        assert!(parse("target_file: \"\"\ncode_edit: \"x\"\n").is_none());
    }
}
