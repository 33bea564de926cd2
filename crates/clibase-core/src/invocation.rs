//! The context handed to pre-run hooks and command bodies.

use clap::{ArgMatches, Command};

use crate::GlobalFlags;

/// A resolved command invocation.
///
/// Built by the root command after parsing, once the target command has been
/// identified. Borrows the leaf command definition and its matches.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    command: &'a Command,
    matches: &'a ArgMatches,
    flags: &'a GlobalFlags,
    path: Vec<String>,
    args: Vec<String>,
}

impl<'a> Invocation<'a> {
    /// Create an invocation for `command`.
    ///
    /// `path` lists command names from the root to `command` inclusive;
    /// `args` holds the positional arguments in declaration order.
    pub fn new(
        command: &'a Command,
        matches: &'a ArgMatches,
        flags: &'a GlobalFlags,
        path: Vec<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            command,
            matches,
            flags,
            path,
            args,
        }
    }

    /// The command being run.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Name of the command being run.
    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// Matches for the command being run, including inherited global flags.
    pub fn matches(&self) -> &'a ArgMatches {
        self.matches
    }

    /// Parsed global flags.
    pub fn flags(&self) -> &'a GlobalFlags {
        self.flags
    }

    /// Command names from the root down to the command being run.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Space-separated command path, e.g. `"app remote add"`.
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }

    /// Positional arguments of the command being run.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True when the root command itself was invoked.
    pub fn is_root(&self) -> bool {
        self.path.len() <= 1
    }
}
