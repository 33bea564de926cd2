//! Application subcommands.
//!
//! A [`CliCommand`] pairs a clap [`Command`] definition with an optional body
//! and any nested child commands. The root command attaches them and routes
//! each invocation to the deepest matched body.

use std::fmt;

use clap::Command;
use clibase_core::{CommandHandler, Invocation, Result};

/// A subcommand supplied by the embedding application.
pub struct CliCommand {
    definition: Command,
    handler: Option<Box<dyn CommandHandler>>,
    subcommands: Vec<CliCommand>,
}

impl CliCommand {
    /// A command whose body is the given closure or function.
    pub fn new<F>(definition: Command, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<()> + 'static,
    {
        Self::from_handler(definition, body)
    }

    /// A command whose body is a [`CommandHandler`] implementation.
    pub fn from_handler(definition: Command, handler: impl CommandHandler + 'static) -> Self {
        Self {
            definition,
            handler: Some(Box::new(handler)),
            subcommands: Vec::new(),
        }
    }

    /// A body-less parent; invoking it on its own prints its help.
    pub fn group(definition: Command) -> Self {
        Self {
            definition,
            handler: None,
            subcommands: Vec::new(),
        }
    }

    /// Attach a nested subcommand.
    pub fn with_subcommand(mut self, child: CliCommand) -> Self {
        self.subcommands.push(child);
        self
    }

    /// The command's name as matched by clap.
    pub fn name(&self) -> &str {
        self.definition.get_name()
    }

    /// The command's body, if any.
    pub fn handler(&self) -> Option<&dyn CommandHandler> {
        self.handler.as_deref()
    }

    /// Nested subcommands.
    pub fn subcommands(&self) -> &[CliCommand] {
        &self.subcommands
    }

    /// Find a direct child by name.
    pub fn find(&self, name: &str) -> Option<&CliCommand> {
        find_command(&self.subcommands, name)
    }

    /// The full clap definition, nested subcommands included.
    pub fn definition(&self) -> Command {
        self.subcommands
            .iter()
            .fold(self.definition.clone(), |cmd, child| {
                cmd.subcommand(child.definition())
            })
    }
}

impl fmt::Debug for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliCommand")
            .field("name", &self.name())
            .field("runnable", &self.handler.is_some())
            .field("subcommands", &self.subcommands)
            .finish()
    }
}

/// Find a command by name among siblings.
pub(crate) fn find_command<'a>(commands: &'a [CliCommand], name: &str) -> Option<&'a CliCommand> {
    commands.iter().find(|c| c.name() == name)
}
