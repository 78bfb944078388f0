// Process adapter - Blocking child processes via std::process

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::trace;

use crate::ports::{ProcessOutput, ProcessRunner};

/// Runs programs with `std::process::Command`, never through a shell
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        trace!(program = %program.display(), ?args, "spawning process");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ProcessOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Last `lines` non-empty lines of process output, for error messages
pub fn output_tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let skip = kept.len().saturating_sub(lines);
    kept[skip..].join("\n")
}

/// Human readable exit status
pub fn describe_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
