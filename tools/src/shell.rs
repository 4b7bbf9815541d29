//! Shell detection and configuration for command execution.

use std::path::PathBuf;

use crate::config::ShellConfig;

/// Detected shell for command execution.
#[derive(Debug, Clone)]
pub struct DetectedShell {
    /// Path or name of the shell binary.
    pub binary: PathBuf,
    /// Arguments to pass before the command string (e.g., `["-c"]`).
    pub args: Vec<String>,
    /// Human-readable name for logging.
    pub name: String,
}

impl std::fmt::Display for DetectedShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Detect the shell to execute commands with.
///
/// Priority:
/// - Config override (if set)
/// - `bash` from PATH, profile- and rc-free so command behavior is stable
/// - `/bin/sh`
#[must_use]
pub fn detect_shell(config: Option<&ShellConfig>) -> DetectedShell {
    if let Some(cfg) = config
        && let Some(binary) = &cfg.binary
    {
        let args = cfg.args.clone().unwrap_or_else(|| default_args_for(binary));
        return DetectedShell {
            binary: PathBuf::from(binary),
            args,
            name: "configured".into(),
        };
    }

    if let Ok(path) = which::which("bash") {
        return DetectedShell {
            binary: path,
            args: bash_args(),
            name: "bash".into(),
        };
    }

    DetectedShell {
        binary: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string()],
        name: "sh".into(),
    }
}

fn bash_args() -> Vec<String> {
    vec![
        "--noprofile".to_string(),
        "--norc".to_string(),
        "-c".to_string(),
    ]
}

/// Infer default args for a shell binary name.
fn default_args_for(binary: &str) -> Vec<String> {
    let name = std::path::Path::new(binary)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(binary)
        .to_lowercase();

    match name.as_str() {
        "bash" => bash_args(),
        _ => vec!["-c".to_string()],
    }
}
