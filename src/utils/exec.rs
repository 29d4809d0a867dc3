//! External command execution utilities.
//!
//! Provides a Builder-based API for running the compiler toolchain. Child
//! stdout/stderr are inherited, so diagnostics reach the terminal unmodified
//! and in real time.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let status = Cmd::new("cc")
//!     .args(["-c", "-o", "builds/src_a.c.o", "src/a.c"])
//!     .args(config.cc_flags())
//!     .run()?;
//! ```

use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    process::{Command, ExitStatus, Stdio},
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments. Empty arguments are dropped.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Render the command line for logging.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command, streaming its output, and return the exit status.
    ///
    /// Blocks until the child exits. There is no timeout.
    pub fn run(self) -> Result<ExitStatus> {
        let name = self.program_name();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        cmd.status()
            .with_context(|| format!("Failed to execute `{name}`"))
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
