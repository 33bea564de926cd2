//! A small application built on the clibase root command.
//!
//! Adds a `--strict` flag, loads an optional config file in its pre-run
//! hook, and provides three subcommands: `greet`, `flags`, and `fail`.

use std::cell::RefCell;
use std::rc::Rc;

use clap::{Arg, ArgAction, Args, Command, FromArgMatches};
use clibase_cli::{CliCommand, CustomPreRunFunc, Error, Invocation, Result, execute, load_config};
use serde::Deserialize;

const APP_NAME: &str = "clibase-demo";

/// Settings read from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    greeting: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello".to_string(),
        }
    }
}

type Shared = Rc<RefCell<DemoConfig>>;

fn register_flags(root: Command) -> Command {
    root.arg(
        Arg::new("strict")
            .long("strict")
            .help("Require an explicit config file")
            .action(ArgAction::SetTrue)
            .global(true),
    )
}

fn pre_run(settings: Shared) -> CustomPreRunFunc {
    Box::new(move |inv| {
        let flags = inv.flags();
        if inv.matches().get_flag("strict") && flags.config_path().is_none() {
            return Err(Error::command("--strict requires --config"));
        }

        let config: DemoConfig = load_config(APP_NAME, flags)?;
        tracing::debug!(?config, "loaded demo config");
        *settings.borrow_mut() = config;
        Ok(())
    })
}

/// Arguments of `greet`.
#[derive(Debug, Args)]
struct GreetArgs {
    /// Who to greet
    name: Option<String>,
}

fn greet(settings: Shared) -> CliCommand {
    CliCommand::new(
        GreetArgs::augment_args(Command::new("greet").about("Print a greeting")),
        move |inv| {
            let args = GreetArgs::from_arg_matches(inv.matches())?;
            let name = args.name.as_deref().unwrap_or("world");
            println!("{}, {name}!", settings.borrow().greeting);
            Ok(())
        },
    )
}

fn show_flags(inv: &Invocation<'_>) -> Result<()> {
    let flags = inv.flags();
    println!("verbose={} config={}", flags.verbose, flags.config_file);
    Ok(())
}

fn fail(_: &Invocation<'_>) -> Result<()> {
    Err(Error::command("demo failure requested"))
}

fn main() {
    let settings = Shared::default();
    let subcommands = vec![
        greet(settings.clone()),
        CliCommand::new(
            Command::new("flags").about("Show the parsed global flags"),
            show_flags,
        ),
        CliCommand::new(Command::new("fail").about("Always fail"), fail),
    ];

    execute(
        APP_NAME,
        Some(Box::new(register_flags)),
        Some(pre_run(settings)),
        subcommands,
    )
}
