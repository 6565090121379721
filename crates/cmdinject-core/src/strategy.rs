//! Command construction strategies
//!
//! The two routes differ only in how they turn the user's input into a
//! process invocation. Keeping that as data lets tests assert on the exact
//! command without spawning anything.

use std::fmt;

/// Shell used for interpreted command lines
pub const SHELL: &str = "/bin/sh";

/// Target program both routes run
pub const PING_PROGRAM: &str = "ping";

/// Fixed arguments placed before the target: a single echo request
pub const PING_ARGS: [&str; 2] = ["-c", "1"];

/// How a command is handed to the operating system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandExecutionStrategy {
    /// A full command line run through `sh -c`. The shell tokenizes it and
    /// honours `;`, `|`, backticks, `$()` and the rest of its grammar.
    ShellInterpreted { command_line: String },

    /// A program and a pre-split argument list. No shell is involved.
    DirectArgumentVector { program: String, args: Vec<String> },
}

impl CommandExecutionStrategy {
    /// `ping -c 1 <target>` concatenated into one shell command line.
    /// The target is not escaped.
    pub fn ping_via_shell(target: &str) -> Self {
        Self::ShellInterpreted {
            command_line: format!("{} {} {}", PING_PROGRAM, PING_ARGS.join(" "), target),
        }
    }

    /// `ping` with `["-c", "1", <target>]`, the target as one discrete argument
    pub fn ping_direct(target: &str) -> Self {
        let mut args: Vec<String> = PING_ARGS.iter().map(|s| s.to_string()).collect();
        args.push(target.to_string());
        Self::DirectArgumentVector {
            program: PING_PROGRAM.to_string(),
            args,
        }
    }

    /// Program actually spawned
    pub fn program(&self) -> &str {
        match self {
            Self::ShellInterpreted { .. } => SHELL,
            Self::DirectArgumentVector { program, .. } => program,
        }
    }

    /// Arguments passed to [`program`](Self::program)
    pub fn args(&self) -> Vec<&str> {
        match self {
            Self::ShellInterpreted { command_line } => vec!["-c", command_line.as_str()],
            Self::DirectArgumentVector { args, .. } => args.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_shell_interpreted(&self) -> bool {
        matches!(self, Self::ShellInterpreted { .. })
    }
}

impl fmt::Display for CommandExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShellInterpreted { command_line } => write!(f, "{} -c {:?}", SHELL, command_line),
            Self::DirectArgumentVector { program, args } => write!(f, "{} {:?}", program, args),
        }
    }
}
