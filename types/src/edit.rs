//! Edit request and result types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// A structured instruction to edit one file.
///
/// `target_file` names the file relative to the workspace root, and
/// `code_edit` carries the literal replacement/overlay text verbatim,
/// including original whitespace and newlines. `instructions` is advisory
/// prose and is never semantically parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub target_file: String,
    #[serde(default)]
    pub instructions: String,
    pub code_edit: String,
}

impl EditRequest {
    #[must_use]
    pub fn new(
        target_file: impl Into<String>,
        instructions: impl Into<String>,
        code_edit: impl Into<String>,
    ) -> Self {
        Self {
            target_file: target_file.into(),
            instructions: instructions.into(),
            code_edit: code_edit.into(),
        }
    }
}

/// Outcome of applying an edit request.
///
/// Exactly one variant is populated; callers must branch on the variant
/// and never assume a patch exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Success {
        message: String,
        patch: Patch,
        target_file: PathBuf,
    },
    Error {
        message: String,
    },
}

impl EditResult {
    #[must_use]
    pub fn success(message: impl Into<String>, patch: Patch, target_file: PathBuf) -> Self {
        Self::Success {
            message: message.into(),
            patch,
            target_file,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The human-readable message regardless of variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Error { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Patch;

    #[test]
    fn request_equality_is_structural() {
        let a = EditRequest::new("src/a.ts", "rename var", "let x = 1;\n");
        let b = EditRequest::new("src/a.ts", "rename var", "let x = 1;\n");
        assert_eq!(a, b);
    }

    #[test]
    fn result_branches_on_variant() {
        let err = EditResult::error("File not found: src/a.ts");
        assert!(!err.is_success());
        assert_eq!(err.message(), "File not found: src/a.ts");

        let ok = EditResult::success(
            "File edited successfully: src/a.ts",
            Patch::new("src/a.ts", "src/a.ts"),
            PathBuf::from("/ws/src/a.ts"),
        );
        assert!(ok.is_success());
    }

    #[test]
    fn missing_instructions_defaults_to_empty() {
        let req: EditRequest =
            serde_json::from_str(r#"{"target_file": "a.rs", "code_edit": "x"}"#)
                .expect("valid request");
        assert_eq!(req.instructions, "");
        assert_eq!(req.target_file, "a.rs");
    }
}
