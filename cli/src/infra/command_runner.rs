//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` spawns the program directly (never through a shell),
//! echoes stdout and stderr line by line as they arrive and keeps a combined
//! copy for the caller.

use std::cell::RefCell;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::application::ports::{CommandOutcome, CommandRunner};
use crate::domain::CommandSpec;

/// Production `CommandRunner` backed by `tokio::process`.
///
/// No timeout: package upgrades and host key regeneration block the run
/// until they finish.
pub struct TokioCommandRunner {
    echo: bool,
}

impl TokioCommandRunner {
    /// `echo` controls whether command output is printed while it runs.
    #[must_use]
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutcome> {
        debug!(command = %cmd, "spawning");
        let mut child = tokio::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", cmd.program))?;

        let stdout = child
            .stdout
            .take()
            .with_context(|| format!("no stdout pipe for {}", cmd.program))?;
        let stderr = child
            .stderr
            .take()
            .with_context(|| format!("no stderr pipe for {}", cmd.program))?;

        // Both pipes drain while waiting.
        let combined = RefCell::new(String::new());
        let (status, out_res, err_res) = tokio::join!(
            child.wait(),
            pump(stdout, &combined, self.echo),
            pump(stderr, &combined, self.echo),
        );
        out_res.with_context(|| format!("reading stdout of {}", cmd.program))?;
        err_res.with_context(|| format!("reading stderr of {}", cmd.program))?;
        let status = status.with_context(|| format!("waiting for {}", cmd.program))?;

        let exit_code = status.code().unwrap_or(-1);
        debug!(command = %cmd, exit_code, "finished");
        Ok(CommandOutcome::from_code(exit_code, combined.into_inner()))
    }
}

/// Copy `stream` line by line into `sink`, echoing each line when asked.
async fn pump<S: AsyncRead + Unpin>(
    stream: S,
    sink: &RefCell<String>,
    echo: bool,
) -> std::io::Result<()> {
    let mut console = tokio::io::stdout();
    let mut segments = BufReader::new(stream).split(b'\n');
    while let Some(segment) = segments.next_segment().await? {
        let mut line = String::from_utf8_lossy(&segment)
            .trim_end_matches('\r')
            .to_string();
        line.push('\n');
        if echo {
            console.write_all(line.as_bytes()).await?;
            console.flush().await?;
        }
        sink.borrow_mut().push_str(&line);
    }
    Ok(())
}
