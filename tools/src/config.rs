//! Configuration types for the edit and execution tools.

use std::path::Path;

use serde::Deserialize;

/// Top-level configuration, loaded from `scribe.toml` at the workspace
/// root when present.
///
/// ```toml
/// [shell]
/// binary = "bash"
/// args = ["--noprofile", "--norc", "-c"]
///
/// [exec]
/// timeout_secs = 120
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub exec: ExecConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

impl ScribeConfig {
    /// Load configuration from `<root>/scribe.toml`.
    ///
    /// A missing file yields defaults; a malformed file is logged and
    /// also yields defaults rather than failing the caller.
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let path = root.join("scribe.toml");
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Malformed config, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Shell override for command execution.
#[derive(Debug, Default, Deserialize)]
pub struct ShellConfig {
    /// Override shell binary (e.g., "bash", "/usr/local/bin/fish").
    pub binary: Option<String>,
    /// Override shell args (e.g., `["-c"]`).
    pub args: Option<Vec<String>>,
}

/// Process executor settings.
#[derive(Debug, Deserialize)]
pub struct ExecConfig {
    /// Overall bound on one command; timeouts fail, never hang.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pseudo-terminal width for interactive sessions.
    #[serde(default = "default_cols")]
    pub cols: u16,
    /// Pseudo-terminal height for interactive sessions.
    #[serde(default = "default_rows")]
    pub rows: u16,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_cols() -> u16 {
    240
}

const fn default_rows() -> u16 {
    80
}

/// Serde helper for fields that default to `true`.
#[must_use]
pub const fn default_true() -> bool {
    true
}

/// Edit controller settings.
#[derive(Debug, Deserialize)]
pub struct EditConfig {
    /// Fall back to a workspace-wide lookup when the exact relative path
    /// misses.
    #[serde(default = "default_true")]
    pub fuzzy_lookup: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self { fuzzy_lookup: true }
    }
}

#[cfg(test)]
mod tests {
    use super::ScribeConfig;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ScribeConfig::load(dir.path());
        assert_eq!(config.exec.timeout_secs, 120);
        assert_eq!(config.exec.cols, 240);
        assert_eq!(config.exec.rows, 80);
        assert!(config.edit.fuzzy_lookup);
        assert!(config.shell.binary.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("scribe.toml"),
            "[exec]\ntimeout_secs = 5\n",
        )
        .expect("write config");
        let config = ScribeConfig::load(dir.path());
        assert_eq!(config.exec.timeout_secs, 5);
        assert_eq!(config.exec.cols, 240);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("scribe.toml"), "not [valid toml").expect("write config");
        let config = ScribeConfig::load(dir.path());
        assert_eq!(config.exec.timeout_secs, 120);
    }
}
