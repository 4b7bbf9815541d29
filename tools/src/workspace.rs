//! Workspace file resolution.
//!
//! The edit controller only needs two things from the surrounding project:
//! resolve a relative path to a real file, and express a real file's path
//! relative to the project root. The fuzzy fallback covers agents that
//! name files by suffix or bare basename.

use std::path::{Path, PathBuf};

/// A project root plus lookup helpers.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    fuzzy_lookup: bool,
}

impl Workspace {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fuzzy_lookup: true,
        }
    }

    #[must_use]
    pub fn with_fuzzy_lookup(mut self, enabled: bool) -> Self {
        self.fuzzy_lookup = enabled;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Resolve a path relative to the root.
    ///
    /// Exact relative path first; when that misses and fuzzy lookup is
    /// enabled, walk the workspace (honoring ignore files) and match by
    /// path suffix, then by bare basename.
    #[must_use]
    pub fn resolve_file(&self, relative: &str) -> Option<PathBuf> {
        let exact = self.root.join(relative);
        if exact.is_file() {
            return Some(exact);
        }
        if !self.fuzzy_lookup {
            return None;
        }
        self.lookup_file(relative)
    }

    fn lookup_file(&self, relative: &str) -> Option<PathBuf> {
        let needle = Path::new(relative);
        let basename = needle.file_name()?;

        let mut basename_match: Option<PathBuf> = None;
        for entry in ignore::WalkBuilder::new(&self.root).build().flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.ends_with(needle) {
                return Some(path.to_path_buf());
            }
            if basename_match.is_none() && path.file_name() == Some(basename) {
                basename_match = Some(path.to_path_buf());
            }
        }
        basename_match
    }

    /// The file's path relative to the root, as a display string.
    #[must_use]
    pub fn relative_path_of(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
