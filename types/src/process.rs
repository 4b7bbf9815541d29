//! Shell execution result type.

use serde::{Deserialize, Serialize};

/// Fully-drained outcome of one shell command.
///
/// Both output strings are stable by the time this is constructed: the
/// executor only assembles a result after the child has exited and both
/// stream drains have run to exhaustion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessExecutorResult {
    pub exit_code: i32,
    pub std_output: String,
    pub err_output: String,
}

impl ProcessExecutorResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
