//! Running external tools with their output streamed to stderr.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{Error, Result};

/// Exit status of a command whose output was streamed through.
#[derive(Debug, Clone)]
pub struct StreamedStatus {
    pub command: String,
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Render a program and its arguments for log and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command in `dir`, forwarding its stdout and stderr line by line
/// to our stderr while it runs.
///
/// Returns an error only when the process cannot be spawned or waited on.
/// A non-zero exit is reported through `StreamedStatus::success`.
pub fn run_streaming(dir: &Path, program: &str, args: &[String]) -> Result<StreamedStatus> {
    let command = display_command(program, args);

    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", command, e),
                Some(command.clone()),
            )
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Drain both pipes while the child runs.
    thread::scope(|scope| {
        if let Some(out) = stdout {
            scope.spawn(move || forward_lines(out));
        }
        if let Some(err) = stderr {
            scope.spawn(move || forward_lines(err));
        }
    });

    let status = child
        .wait()
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("wait for {}", command))))?;

    Ok(StreamedStatus {
        command,
        success: status.success(),
        exit_code: status.code(),
    })
}

fn forward_lines<R: Read>(reader: R) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let stderr = io::stderr();
                let mut handle = stderr.lock();
                let _ = writeln!(handle, "{}", line.trim_end_matches(['\r', '\n']));
            }
        }
    }
}
