//! Side-effecting layer for Scribe: the edit controller that materializes
//! parsed edit requests as reviewable patches, and the shell process
//! executor with streaming output capture.

pub mod apply;
pub mod config;
pub mod edit;
pub mod executor;
pub mod notify;
pub mod process;
pub mod session;
pub mod shell;
pub mod workspace;

pub use apply::{EditApplier, OverlayMerge};
pub use config::{EditConfig, ExecConfig, ScribeConfig, ShellConfig};
pub use edit::EditController;
pub use executor::ProcessExecutor;
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use session::InteractiveSession;
pub use shell::{DetectedShell, detect_shell};
pub use workspace::Workspace;
