//! Global flag definitions and root command construction helpers.
//!
//! Provides the flags every clibase application shares (`--verbose` and
//! `--config`), the root command's descriptions, and the functions that read
//! parsed values back out of clap's matches.

use clap::{Arg, ArgAction, ArgMatches, Command};
use clibase_core::{Error, GlobalFlags, Result};

// ============================================================================
// Flag identifiers
// ============================================================================

/// Id, long name, and short name of the verbose flag.
pub const VERBOSE_FLAG: &str = "verbose";
const VERBOSE_SHORT: char = 'v';

/// Id, long name, and short name of the config flag.
pub const CONFIG_FLAG: &str = "config";
const CONFIG_SHORT: char = 'c';

/// Notice printed by the pre-run hook when verbose mode is on.
pub const VERBOSE_NOTICE: &str = "Verbose mode enabled.";

// ============================================================================
// Descriptions
// ============================================================================

/// Short description of the root command.
///
/// `app_name` must not contain full-width or no-break spaces.
pub fn short_description(app_name: &str) -> String {
    format!("A CLI tool for {app_name}.")
}

/// Long description of the root command.
pub fn long_description(app_name: &str) -> String {
    format!("The CLI tool for {app_name}. Use a subcommand to perform a task.")
}

// ============================================================================
// Root command
// ============================================================================

/// The global flags, marked `global` so every subcommand inherits them.
pub fn global_args() -> [Arg; 2] {
    [
        Arg::new(VERBOSE_FLAG)
            .short(VERBOSE_SHORT)
            .long(VERBOSE_FLAG)
            .help("Enable verbose output")
            .action(ArgAction::SetTrue)
            .global(true),
        Arg::new(CONFIG_FLAG)
            .short(CONFIG_SHORT)
            .long(CONFIG_FLAG)
            .value_name("PATH")
            .help("Config file path")
            .action(ArgAction::Set)
            .global(true),
    ]
}

/// A bare root command for `app_name` with descriptions and global flags.
pub fn root_command(app_name: &str) -> Command {
    Command::new(app_name.to_string())
        .about(short_description(app_name))
        .long_about(long_description(app_name))
        .args(global_args())
}

/// Reject application flags that reuse a global flag's id, long, or short name.
pub fn check_flag_conflicts(command: &Command) -> Result<()> {
    check_global_uses(command, 1)
}

/// Reject a subcommand tree in which any command defines its own `verbose`
/// or `config` flag, or takes `-v` or `-c`.
///
/// The global flags are only propagated once the tree is attached to the
/// root, so a single use anywhere in `command` is a conflict.
pub fn check_subcommand_conflicts(command: &Command) -> Result<()> {
    check_global_uses(command, 0)?;
    command
        .get_subcommands()
        .try_for_each(check_subcommand_conflicts)
}

fn check_global_uses(command: &Command, allowed: usize) -> Result<()> {
    for (name, short) in [(VERBOSE_FLAG, VERBOSE_SHORT), (CONFIG_FLAG, CONFIG_SHORT)] {
        let uses = command
            .get_arguments()
            .filter(|arg| {
                arg.get_id().as_str() == name
                    || arg.get_long() == Some(name)
                    || arg.get_short() == Some(short)
            })
            .count();
        if uses > allowed {
            return Err(Error::FlagConflict {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Reading matches
// ============================================================================

/// Read the global flags from the matches of any command in the tree.
///
/// Values are taken from the deepest matched subcommand, where clap has
/// propagated every global flag regardless of where it appeared.
pub fn read_global_flags(matches: &ArgMatches) -> GlobalFlags {
    let mut leaf = matches;
    while let Some((_, sub)) = leaf.subcommand() {
        leaf = sub;
    }
    GlobalFlags {
        verbose: leaf.get_flag(VERBOSE_FLAG),
        config_file: leaf
            .get_one::<String>(CONFIG_FLAG)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Positional argument values of `command`, in declaration order.
pub fn positional_args(command: &Command, matches: &ArgMatches) -> Vec<String> {
    command
        .get_positionals()
        .filter_map(|arg| matches.get_raw(arg.get_id().as_str()))
        .flatten()
        .map(|value| value.to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
