//! Edit controller: resolve, read, merge, write, diff.
//!
//! `execute_edit` owns the full pipeline from a parsed [`EditRequest`] to
//! an [`EditResult`]. Every failure path terminates in a well-formed
//! `EditResult::Error`; nothing propagates past this boundary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;

use scribe_types::{EditError, EditRequest, EditResult};
use scribe_utils::{atomic_write, create_patch};

use crate::apply::{EditApplier, OverlayMerge};
use crate::workspace::Workspace;

pub struct EditController {
    workspace: Workspace,
    applier: Box<dyn EditApplier>,
    // Single-writer contexts, one per target file. Concurrent edits to the
    // same file are strictly ordered; edits to different files proceed in
    // parallel.
    write_locks: StdMutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl EditController {
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self::with_applier(workspace, Box::new(OverlayMerge))
    }

    #[must_use]
    pub fn with_applier(workspace: Workspace, applier: Box<dyn EditApplier>) -> Self {
        Self {
            workspace,
            applier,
            write_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Run the cascading parser over raw agent output.
    #[must_use]
    pub fn parse_edit_request(content: &str) -> Option<EditRequest> {
        scribe_parser::parse_edit_request(content)
    }

    /// Materialize an edit request on disk.
    pub async fn execute_edit(&self, request: &EditRequest) -> EditResult {
        match self.try_execute(request).await {
            Ok(result) => result,
            Err(e) => EditResult::error(e.to_string()),
        }
    }

    async fn try_execute(&self, request: &EditRequest) -> Result<EditResult, EditError> {
        if !self.workspace.exists() {
            return Err(EditError::ProjectNotFound);
        }

        let target_file = self
            .workspace
            .resolve_file(&request.target_file)
            .ok_or_else(|| EditError::FileNotFound {
                path: request.target_file.clone(),
            })?;

        let original_content =
            std::fs::read_to_string(&target_file).map_err(|e| EditError::ReadFailure {
                path: request.target_file.clone(),
                cause: e.to_string(),
            })?;

        let edited_content = self
            .applier
            .apply(&original_content, &request.code_edit)
            .map_err(|e| EditError::MergeFailure {
                path: request.target_file.clone(),
                cause: e.to_string(),
            })?;

        let lock = self.lock_for(&target_file);
        {
            let _guard = lock.lock().await;
            atomic_write(&target_file, edited_content.as_bytes()).map_err(|e| {
                EditError::WriteFailure {
                    cause: e.to_string(),
                }
            })?;
        }

        let relative = self.workspace.relative_path_of(&target_file);
        let patch = create_patch(&original_content, &edited_content, &relative).ok_or_else(
            || EditError::NoChangesDetected {
                path: request.target_file.clone(),
            },
        )?;

        tracing::info!(target = %relative, hunks = patch.hunks.len(), "applied edit");
        Ok(EditResult::success(
            format!("File edited successfully: {}", request.target_file),
            patch,
            target_file,
        ))
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut map = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(path.to_path_buf()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{EditController, Workspace};
    use scribe_types::{EditRequest, EditResult};

    fn fixture(content: &str) -> (tempfile::TempDir, EditController) {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        fs::write(dir.path().join("src/a.rs"), content).expect("write");
        let controller = EditController::new(Workspace::new(dir.path()));
        (dir, controller)
    }

    #[tokio::test]
    async fn successful_edit_returns_patch_with_relative_names() {
        let (dir, controller) = fixture("fn main() {\n    old();\n}\n");
        let request = EditRequest::new("src/a.rs", "call new", "fn main() {\n    new();\n}\n");

        let result = controller.execute_edit(&request).await;
        let EditResult::Success {
            message,
            patch,
            target_file,
        } = result
        else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(message, "File edited successfully: src/a.rs");
        assert_eq!(patch.before_name, "src/a.rs");
        assert_eq!(patch.after_name, "src/a.rs");
        assert!(!patch.is_empty());
        assert!(target_file.ends_with("src/a.rs"));

        let on_disk = fs::read_to_string(dir.path().join("src/a.rs")).expect("read");
        assert_eq!(on_disk, "fn main() {\n    new();\n}\n");
    }

    #[tokio::test]
    async fn identical_content_is_no_changes_detected_not_success() {
        let (_dir, controller) = fixture("fn main() {}\n");
        let request = EditRequest::new("src/a.rs", "", "fn main() {}\n");

        let result = controller.execute_edit(&request).await;
        let EditResult::Error { message } = result else {
            panic!("expected error, got {result:?}");
        };
        assert_eq!(message, "No changes detected in src/a.rs");
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_its_path() {
        let (_dir, controller) = fixture("x\n");
        let request = EditRequest::new("src/nope.rs", "", "y\n");

        let result = controller.execute_edit(&request).await;
        assert_eq!(result.message(), "File not found: src/nope.rs");
    }

    #[tokio::test]
    async fn missing_project_directory_is_reported() {
        let controller = EditController::new(Workspace::new("/definitely/not/a/real/root"));
        let request = EditRequest::new("a.rs", "", "x\n");

        let result = controller.execute_edit(&request).await;
        assert_eq!(result.message(), "Project directory not found");
    }

    #[tokio::test]
    async fn fuzzy_resolution_applies_to_the_real_file() {
        let (dir, controller) = fixture("old\n");
        let request = EditRequest::new("a.rs", "", "new\n");

        let result = controller.execute_edit(&request).await;
        assert!(result.is_success(), "got {result:?}");
        let on_disk = fs::read_to_string(dir.path().join("src/a.rs")).expect("read");
        assert_eq!(on_disk, "new\n");
    }

    #[tokio::test]
    async fn concurrent_edits_to_one_file_are_serialized() {
        let (dir, controller) = fixture("start\n");
        let controller = std::sync::Arc::new(controller);

        let mut handles = Vec::new();
        for i in 0..8 {
            let controller = std::sync::Arc::clone(&controller);
            handles.push(tokio::spawn(async move {
                let request = EditRequest::new("src/a.rs", "", format!("content {i}\n"));
                controller.execute_edit(&request).await
            }));
        }
        for handle in handles {
            let _ = handle.await.expect("task");
        }

        // Whatever interleaving happened, the file is whole: exactly one
        // writer's full content, never a torn mix.
        let on_disk = fs::read_to_string(dir.path().join("src/a.rs")).expect("read");
        assert!(
            (0..8).any(|i| on_disk == format!("content {i}\n")),
            "unexpected content: {on_disk:?}"
        );
    }
}
