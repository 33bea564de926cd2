//! Root command framework for clibase applications.
//!
//! This crate provides a root command that domain applications extend with
//! their own subcommands, flags, and pre-run logic.
//!
//! # Key Abstractions
//!
//! - [`CliBase`]: builder for the root command
//! - [`RootCommand`]: parse, pre-run, and dispatch cycle plus exit handling
//! - [`CliCommand`]: application subcommand with an optional body
//! - [`execute`]: one-call entry point for `main`

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod command;
pub mod config;

pub use app::{
    CliBase, CustomFlagFunc, CustomPreRunFunc, RootCommand, build_root_command, execute,
    init_logging,
};
pub use command::CliCommand;
pub use config::{ConfigSource, load_config, resolve_config_path};

pub use clibase_core::{CommandHandler, Error, FlagsStore, GlobalFlags, Invocation, Result};
