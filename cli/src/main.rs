//! Scribe CLI - binary entry point.
//!
//! Three commands:
//!
//! - `scribe edit [--root DIR]` reads raw agent output from stdin, parses
//!   the edit request out of it, applies the edit under the workspace
//!   root, and prints the resulting patch.
//! - `scribe run [--root DIR] [--timeout SECS] -- <command...>` runs a
//!   shell command with streaming capture and forwards its exit code.
//! - `scribe shell [--root DIR]` opens an interactive shell session under
//!   a pseudo-terminal.

use std::env;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use scribe_tools::session::spawn_interactive_session;
use scribe_tools::{
    EditController, ProcessExecutor, ScribeConfig, TracingNotifier, Workspace, detect_shell,
};
use scribe_types::EditResult;
use scribe_utils::render_patch;

const USAGE: &str = "\
Usage: scribe <command> [options]

Commands:
  edit [--root DIR]
      Read raw agent output from stdin, parse the edit request, apply it.
  run [--root DIR] [--timeout SECS] -- <command...>
      Run a shell command under the workspace root.
  shell [--root DIR]
      Open an interactive shell session under a pseudo-terminal.

The workspace root defaults to the current directory. Settings are read
from <root>/scribe.toml when present.";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::try_new("error").expect("error filter is valid"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match dispatch(env::args().skip(1)).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(mut args: impl Iterator<Item = String>) -> Result<ExitCode> {
    match args.next().as_deref() {
        Some("edit") => {
            let opts = CommonArgs::parse(args)?;
            run_edit(opts).await
        }
        Some("run") => {
            let opts = RunArgs::parse(args)?;
            run_command(opts).await
        }
        Some("shell") => {
            let opts = CommonArgs::parse(args)?;
            run_shell(opts).await
        }
        Some("--help" | "-h") | None => {
            println!("{USAGE}");
            Ok(ExitCode::SUCCESS)
        }
        Some(other) => bail!("unknown command `{other}`\n\n{USAGE}"),
    }
}

struct CommonArgs {
    root: PathBuf,
}

impl CommonArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut root = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => {
                    root = Some(PathBuf::from(
                        args.next().context("--root requires a value")?,
                    ));
                }
                other => bail!("unexpected argument `{other}`\n\n{USAGE}"),
            }
        }
        Ok(Self {
            root: resolve_root(root)?,
        })
    }
}

struct RunArgs {
    root: PathBuf,
    timeout: Option<u64>,
    command: String,
}

impl RunArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut root = None;
        let mut timeout = None;
        let mut command_parts = Vec::new();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => {
                    root = Some(PathBuf::from(
                        args.next().context("--root requires a value")?,
                    ));
                }
                "--timeout" => {
                    let raw = args.next().context("--timeout requires a value")?;
                    timeout = Some(
                        raw.parse()
                            .with_context(|| format!("invalid timeout `{raw}`"))?,
                    );
                }
                "--" => {
                    command_parts.extend(args);
                    break;
                }
                other => bail!("unexpected argument `{other}`\n\n{USAGE}"),
            }
        }
        if command_parts.is_empty() {
            bail!("run requires a command after `--`\n\n{USAGE}");
        }
        Ok(Self {
            root: resolve_root(root)?,
            timeout,
            command: command_parts.join(" "),
        })
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => env::current_dir().context("cannot determine current directory"),
    }
}

async fn run_edit(opts: CommonArgs) -> Result<ExitCode> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let Some(request) = EditController::parse_edit_request(&input) else {
        eprintln!("No edit request found in input");
        return Ok(ExitCode::FAILURE);
    };

    let config = ScribeConfig::load(&opts.root);
    let workspace = Workspace::new(opts.root).with_fuzzy_lookup(config.edit.fuzzy_lookup);
    let controller = EditController::new(workspace);

    match controller.execute_edit(&request).await {
        EditResult::Success { message, patch, .. } => {
            println!("{message}");
            print!("{}", render_patch(&patch));
            Ok(ExitCode::SUCCESS)
        }
        EditResult::Error { message } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_command(opts: RunArgs) -> Result<ExitCode> {
    let config = ScribeConfig::load(&opts.root);
    let shell = detect_shell(Some(&config.shell));
    let timeout = Duration::from_secs(opts.timeout.unwrap_or(config.exec.timeout_secs));

    let executor =
        ProcessExecutor::new(shell, opts.root, Arc::new(TracingNotifier)).with_timeout(timeout);
    let result = executor.run(&opts.command).await?;

    if !result.std_output.is_empty() {
        println!("{}", result.std_output);
    }
    if !result.err_output.is_empty() {
        eprintln!("{}", result.err_output);
    }

    Ok(ExitCode::from(
        u8::try_from(result.exit_code).unwrap_or(u8::MAX),
    ))
}

async fn run_shell(opts: CommonArgs) -> Result<ExitCode> {
    let config = ScribeConfig::load(&opts.root);
    let spawned = spawn_interactive_session(&opts.root, config.exec.cols, config.exec.rows)?;
    let mut session = spawned.session;
    let mut output_rx = spawned.output_rx;
    let mut exit_rx = spawned.exit_rx;

    // Forward stdin on a plain thread; stdin reads have no async story and
    // the thread dies with the process.
    let writer = session.writer_sender();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdin = stdin.lock();
        let mut buf = [0u8; 1024];
        while let Ok(n) = stdin.read(&mut buf) {
            if n == 0 || writer.blocking_send(buf[..n].to_vec()).is_err() {
                break;
            }
        }
    });

    let mut stdout = std::io::stdout();
    let mut exited = None;
    while exited.is_none() {
        tokio::select! {
            code = &mut exit_rx => exited = Some(code.unwrap_or(-1)),
            chunk = output_rx.recv() => {
                // Closed means the shell is gone; fall through to the
                // exit wait.
                if !forward_chunk(chunk, &mut stdout)? {
                    break;
                }
            }
        }
    }
    let code = match exited {
        Some(code) => code,
        None => exit_rx.await.unwrap_or(-1),
    };

    // Flush whatever the reader pumped out before the exit won the race.
    while let Ok(bytes) = output_rx.try_recv() {
        stdout.write_all(&bytes)?;
    }
    stdout.flush()?;
    session.kill();

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX)))
}

/// Forward one session output chunk to the terminal.
///
/// A lagged receiver means the terminal could not keep up and chunks were
/// dropped; that loss is reported instead of passing silently. Returns
/// `false` once the stream is closed.
fn forward_chunk(
    chunk: Result<Vec<u8>, broadcast::error::RecvError>,
    out: &mut impl Write,
) -> std::io::Result<bool> {
    match chunk {
        Ok(bytes) => {
            out.write_all(&bytes)?;
            out.flush()?;
            Ok(true)
        }
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "terminal fell behind; dropped session output chunks");
            Ok(true)
        }
        Err(broadcast::error::RecvError::Closed) => Ok(false),
    }
}
