//! Subprocess execution for pipeline stages.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use derive_builder::Builder;

/// Trait for types that can configure a `Command` before execution.
pub trait ShConfig {
    /// Apply configuration to the given `Command`.
    fn apply(&self, cmd: &mut Command);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMode {
    Inherit,
    Null,
}

#[derive(Clone, Debug, Builder)]
#[builder(default)]
pub struct ShOptions {
    pub stdout: StreamMode,
    pub stderr: StreamMode,
    #[builder(setter(into, strip_option))]
    pub cwd: Option<PathBuf>,
}

impl Default for ShOptions {
    fn default() -> Self {
        Self {
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
            cwd: None,
        }
    }
}

impl ShConfig for ShOptions {
    fn apply(&self, cmd: &mut Command) {
        match self.stdout {
            StreamMode::Inherit => cmd.stdout(Stdio::inherit()),
            StreamMode::Null => cmd.stdout(Stdio::null()),
        };

        match self.stderr {
            StreamMode::Inherit => cmd.stderr(Stdio::inherit()),
            StreamMode::Null => cmd.stderr(Stdio::null()),
        };

        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
    }
}

/// A program plus its arguments, spawned directly (no shell).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Split a user-supplied command string on whitespace.
    /// Returns `None` if the string has no words.
    pub fn split(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program).args(words))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a command to completion and reports how it exited.
pub trait Executor {
    fn execute(&mut self, cmd: &CommandLine, opts: &ShOptions) -> io::Result<ExitStatus>;
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Default)]
pub struct System;

impl Executor for System {
    fn execute(&mut self, cmd: &CommandLine, opts: &ShOptions) -> io::Result<ExitStatus> {
        log::debug!("[sh] {} (in {})", cmd, display_cwd(opts));

        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        opts.apply(&mut command);
        command.status()
    }
}

/// Prints each command instead of running it; every command "succeeds".
#[derive(Debug, Default)]
pub struct DryRun;

impl Executor for DryRun {
    fn execute(&mut self, cmd: &CommandLine, opts: &ShOptions) -> io::Result<ExitStatus> {
        println!("[dry-run] {} (in {})", cmd, display_cwd(opts));
        Ok(ExitStatus::default())
    }
}

fn display_cwd(opts: &ShOptions) -> String {
    opts.cwd
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}
