//! Long-lived interactive shell session over a pseudo-terminal.
//!
//! Unlike [`crate::executor::ProcessExecutor`], a session does no trailer
//! wrapping and no output draining: bytes flow to whoever holds the output
//! receiver, and input flows through the writer channel. The child
//! presents as an interactive terminal, so programs keep line-buffered,
//! prompt-emitting behavior.

use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use portable_pty::{ChildKiller, CommandBuilder, PtySize, native_pty_system};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use scribe_types::ExecError;

/// Handle to a running interactive shell.
///
/// Dropping the session kills the child and tears down its pump tasks.
pub struct InteractiveSession {
    writer_tx: mpsc::Sender<Vec<u8>>,
    output_tx: broadcast::Sender<Vec<u8>>,
    killer: Option<Box<dyn ChildKiller + Send + Sync>>,
    reader_handle: Option<JoinHandle<()>>,
    writer_handle: Option<JoinHandle<()>>,
    wait_handle: Option<JoinHandle<()>>,
    exit_code: Arc<StdMutex<Option<i32>>>,
}

impl InteractiveSession {
    /// Channel for feeding input to the shell.
    #[must_use]
    pub fn writer_sender(&self) -> mpsc::Sender<Vec<u8>> {
        self.writer_tx.clone()
    }

    /// Subscribe to raw output bytes. Ownership of the output stays with
    /// the caller; the session never buffers on their behalf.
    #[must_use]
    pub fn subscribe_output(&self) -> broadcast::Receiver<Vec<u8>> {
        self.output_tx.subscribe()
    }

    /// Exit code, once the shell has terminated.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        *self
            .exit_code
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Terminate the shell early.
    pub fn kill(&mut self) {
        if let Some(mut killer) = self.killer.take() {
            let _ = killer.kill();
        }
    }
}

impl Drop for InteractiveSession {
    fn drop(&mut self) {
        self.kill();
        for handle in [
            self.reader_handle.take(),
            self.writer_handle.take(),
            self.wait_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

/// A freshly spawned session plus its initial output/exit channels.
pub struct SpawnedSession {
    pub session: InteractiveSession,
    pub output_rx: broadcast::Receiver<Vec<u8>>,
    pub exit_rx: oneshot::Receiver<i32>,
}

/// Spawn `bash --noprofile --norc -i` under a PTY of the given size.
pub fn spawn_interactive_session(
    working_dir: &Path,
    cols: u16,
    rows: u16,
) -> Result<SpawnedSession, ExecError> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(launch_error)?;

    let mut command = CommandBuilder::new("bash");
    command.args(["--noprofile", "--norc", "-i"]);
    command.cwd(working_dir);
    command.env("TERM", "dumb");
    command.env("BASH_SILENCE_DEPRECATION_WARNING", "1");
    command.env("GIT_PAGER", "cat");

    let mut child = pair.slave.spawn_command(command).map_err(launch_error)?;
    let killer = child.clone_killer();

    let (writer_tx, mut writer_rx) = mpsc::channel::<Vec<u8>>(128);
    let (output_tx, output_rx) = broadcast::channel::<Vec<u8>>(256);

    let mut reader = pair.master.try_clone_reader().map_err(launch_error)?;
    let reader_output_tx = output_tx.clone();
    let reader_handle = tokio::task::spawn_blocking(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let _ = reader_output_tx.send(buf[..n].to_vec());
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    let mut writer = pair.master.take_writer().map_err(launch_error)?;
    let writer_handle = tokio::spawn(async move {
        while let Some(bytes) = writer_rx.recv().await {
            if writer.write_all(&bytes).is_err() {
                break;
            }
            let _ = writer.flush();
        }
    });

    let (exit_tx, exit_rx) = oneshot::channel::<i32>();
    let exit_code = Arc::new(StdMutex::new(None));
    let wait_exit_code = Arc::clone(&exit_code);
    let wait_handle = tokio::task::spawn_blocking(move || {
        let code = match child.wait() {
            Ok(status) => i32::try_from(status.exit_code()).unwrap_or(-1),
            Err(_) => -1,
        };
        if let Ok(mut guard) = wait_exit_code.lock() {
            *guard = Some(code);
        }
        let _ = exit_tx.send(code);
    });

    let session = InteractiveSession {
        writer_tx,
        output_tx,
        killer: Some(killer),
        reader_handle: Some(reader_handle),
        writer_handle: Some(writer_handle),
        wait_handle: Some(wait_handle),
        exit_code,
    };

    Ok(SpawnedSession {
        session,
        output_rx,
        exit_rx,
    })
}

fn launch_error(e: anyhow::Error) -> ExecError {
    ExecError::Launch {
        cause: e.to_string(),
    }
}
