use std::path::PathBuf;
use std::process::{Command, Stdio};

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

/// Runs the version-control client and hands back its output lines.
///
/// A non-zero exit is not an error here: the diagnostic lines are returned
/// like any other output and callers judge success from the content.
///
/// Implementations return every regular output line first and diagnostics
/// (stderr) after them. The last line is therefore a diagnostic whenever
/// one was printed, which callers checking a trailing success line rely on.
pub trait ToolRunner {
    fn run(&self, subcommand: &str, args: &[&str]) -> Result<Vec<String>, ToolError>;
}

impl<F> ToolRunner for F
where
    F: Fn(&str, &[&str]) -> Result<Vec<String>, ToolError>,
{
    fn run(&self, subcommand: &str, args: &[&str]) -> Result<Vec<String>, ToolError> {
        self(subcommand, args)
    }
}

/// [`ToolRunner`] backed by a real client binary.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
    current_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            current_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn create_command(&self, subcommand: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(subcommand).args(args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        // Pinned locale keeps the output grammar stable.
        cmd.env("LC_ALL", "C").env("LANG", "C");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ToolRunner for CommandRunner {
    fn run(&self, subcommand: &str, args: &[&str]) -> Result<Vec<String>, ToolError> {
        let command_line = format!("{} {} {}", self.program.display(), subcommand, args.join(" "));
        debug!("Running '{}'", command_line);

        let output = self
            .create_command(subcommand, args)
            .output()
            .context(SpawnSnafu {
                command: command_line.clone(),
            })?;

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .collect::<Vec<_>>();

        if output.status.success() {
            debug!("'{}' printed {} lines", command_line, lines.len());
        } else {
            info!(
                "'{}' exited with code {}",
                command_line,
                output.status.code().unwrap_or(-1)
            );
        }

        Ok(lines)
    }
}

#[derive(Debug, Snafu)]
pub enum ToolError {
    #[snafu(display("Failed to start '{}'", command))]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
}
