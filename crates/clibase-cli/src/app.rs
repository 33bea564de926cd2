//! Root command application framework.
//!
//! Provides [`CliBase`], the builder that wires the global flags, an optional
//! application flag callback, and the combined pre-run hook into a
//! [`RootCommand`], and the execution entry points that parse arguments,
//! dispatch to subcommands, and map failures to exit status 1.

use std::ffi::OsString;
use std::io::Write;

use clap::Command;
use clibase_core::{Error, FlagsStore, GlobalFlags, Invocation, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::{self, VERBOSE_NOTICE};
use crate::command::{CliCommand, find_command};

/// Callback that adds application flags to the root command.
pub type CustomFlagFunc = Box<dyn FnOnce(Command) -> Command>;

/// Application pre-run hook, called after the global pre-run logic.
pub type CustomPreRunFunc = Box<dyn Fn(&Invocation<'_>) -> Result<()>>;

// ============================================================================
// CliBase
// ============================================================================

/// Builder for a [`RootCommand`].
///
/// ```
/// use clap::Command;
/// use clibase_cli::{CliBase, CliCommand};
///
/// let mut root = CliBase::new("my-app")
///     .with_subcommand(CliCommand::new(Command::new("status"), |_| Ok(())))
///     .without_logging()
///     .build()
///     .unwrap();
///
/// root.run_from(["my-app", "status", "--verbose"]).unwrap();
/// assert!(root.store().flags().verbose);
/// ```
pub struct CliBase {
    name: String,
    version: Option<String>,
    store: FlagsStore,
    register_flags: Option<CustomFlagFunc>,
    pre_run: Option<CustomPreRunFunc>,
    subcommands: Vec<CliCommand>,
    output: Box<dyn Write>,
    init_logging: bool,
}

impl CliBase {
    /// Start a root command named `name`.
    ///
    /// The name is used verbatim in usage and descriptions; it must not
    /// contain full-width or no-break spaces.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            store: FlagsStore::new(),
            register_flags: None,
            pre_run: None,
            subcommands: Vec::new(),
            output: Box::new(std::io::stdout()),
            init_logging: true,
        }
    }

    /// Enable `--version` with the given version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Publish parsed flags into `store` instead of a fresh one.
    pub fn with_store(mut self, store: FlagsStore) -> Self {
        self.store = store;
        self
    }

    /// Register additional application flags on the root command.
    pub fn with_flags<F>(mut self, register: F) -> Self
    where
        F: FnOnce(Command) -> Command + 'static,
    {
        self.register_flags = Some(Box::new(register));
        self
    }

    /// Run `hook` after the global pre-run logic and before any command body.
    pub fn with_pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<()> + 'static,
    {
        self.pre_run = Some(Box::new(hook));
        self
    }

    /// Attach a subcommand.
    pub fn with_subcommand(mut self, command: CliCommand) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Attach several subcommands.
    pub fn with_subcommands(mut self, commands: impl IntoIterator<Item = CliCommand>) -> Self {
        self.subcommands.extend(commands);
        self
    }

    /// Write help and the verbose notice to `output` instead of stdout.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Leave logging initialisation to the application.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// A handle to the flags store the root command will publish into.
    pub fn store(&self) -> FlagsStore {
        self.store.clone()
    }

    /// Build the root command.
    ///
    /// Global flags are registered first, then the application's flags, then
    /// the combined pre-run hook is installed and subcommands are attached.
    ///
    /// # Errors
    ///
    /// - [`Error::FlagsAlreadyRegistered`] if the store already backs another
    ///   root command.
    /// - [`Error::FlagConflict`] if an application flag or subcommand
    ///   reuses a global flag's name. The store is left unregistered.
    pub fn build(self) -> Result<RootCommand> {
        let mut command = cli::root_command(&self.name);
        if let Some(version) = self.version {
            command = command.version(version);
        }
        if let Some(register) = self.register_flags {
            command = register(command);
            cli::check_flag_conflicts(&command)?;
            command
                .get_subcommands()
                .try_for_each(cli::check_subcommand_conflicts)?;
        }

        let root = RootCommand {
            command,
            pre_run: PreRun {
                app_hook: self.pre_run,
                init_logging: self.init_logging,
            },
            store: self.store,
            subcommands: Vec::new(),
            output: self.output,
        }
        .with_subcommands(self.subcommands)?;

        root.store.mark_registered()?;
        tracing::debug!(app = %self.name, "registered root command flags");
        Ok(root)
    }

    /// Build the root command and run it against the process arguments.
    pub fn execute(self) -> ! {
        match self.build() {
            Ok(root) => root.execute(),
            Err(err) => {
                report(&err);
                std::process::exit(1)
            }
        }
    }
}

// ============================================================================
// Combined pre-run hook
// ============================================================================

/// Global pre-run logic followed by the application's hook.
struct PreRun {
    app_hook: Option<CustomPreRunFunc>,
    init_logging: bool,
}

impl PreRun {
    fn run(&self, invocation: &Invocation<'_>, output: &mut dyn Write) -> Result<()> {
        let verbose = invocation.flags().verbose;
        if verbose {
            writeln!(output, "{VERBOSE_NOTICE}")?;
            output.flush()?;
        }
        if self.init_logging {
            init_logging(verbose);
        }

        match &self.app_hook {
            Some(hook) => hook(invocation),
            None => Ok(()),
        }
    }
}

/// Initialise tracing-based logging on stderr.
///
/// Uses `RUST_LOG` if set, otherwise `debug` when verbose and `info` when not.
pub fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Ignore error if a subscriber is already set (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// RootCommand
// ============================================================================

/// A fully configured root command, ready to accept subcommands and run.
pub struct RootCommand {
    command: Command,
    pre_run: PreRun,
    store: FlagsStore,
    subcommands: Vec<CliCommand>,
    output: Box<dyn Write>,
}

impl RootCommand {
    /// The clap definition, subcommands included.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// The store the parsed flags are published into.
    pub fn store(&self) -> &FlagsStore {
        &self.store
    }

    /// Attach a subcommand.
    ///
    /// # Errors
    ///
    /// [`Error::FlagConflict`] if any command in the subcommand's tree defines
    /// `verbose` or `config`, or takes `-v` or `-c`.
    pub fn with_subcommand(mut self, subcommand: CliCommand) -> Result<Self> {
        let definition = subcommand.definition();
        cli::check_subcommand_conflicts(&definition)?;
        self.command = self.command.subcommand(definition);
        self.subcommands.push(subcommand);
        Ok(self)
    }

    /// Attach several subcommands.
    pub fn with_subcommands(
        self,
        subcommands: impl IntoIterator<Item = CliCommand>,
    ) -> Result<Self> {
        subcommands
            .into_iter()
            .try_fold(self, |root, sub| root.with_subcommand(sub))
    }

    /// Run one parse, pre-run, and dispatch cycle over `args`.
    ///
    /// `args[0]` is the binary name. Help and version requests are written to
    /// the output and succeed.
    pub fn run_from<I, T>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.command.try_get_matches_from_mut(args) {
            Ok(matches) => matches,
            Err(err) => {
                let err = Error::from(err);
                if !err.is_informational() {
                    return Err(err);
                }
                if let Error::Usage(request) = &err {
                    write!(self.output, "{}", request.render())?;
                    self.output.flush()?;
                }
                return Ok(());
            }
        };

        let flags = cli::read_global_flags(&matches);
        self.store.set(flags.clone())?;
        self.dispatch(&matches, &flags)
    }

    fn dispatch(&mut self, matches: &clap::ArgMatches, flags: &GlobalFlags) -> Result<()> {
        let mut command = &self.command;
        let mut current = matches;
        let mut path = vec![command.get_name().to_string()];
        let mut siblings = self.subcommands.as_slice();
        let mut target: Option<&CliCommand> = None;

        while let Some((name, sub_matches)) = current.subcommand() {
            let node = find_command(siblings, name)
                .ok_or_else(|| Error::not_found(format!("no handler for command '{name}'")))?;
            command = command
                .find_subcommand(name)
                .ok_or_else(|| Error::not_found(format!("command '{name}'")))?;
            path.push(name.to_string());
            siblings = node.subcommands();
            target = Some(node);
            current = sub_matches;
        }

        let args = cli::positional_args(command, current);
        let invocation = Invocation::new(command, current, flags, path, args);
        tracing::debug!(command = %invocation.command_path(), "running pre-run hooks");
        self.pre_run.run(&invocation, &mut *self.output)?;

        match target.and_then(CliCommand::handler) {
            Some(handler) => {
                tracing::debug!(command = %invocation.command_path(), "running command");
                handler.run(&invocation)
            }
            None => {
                let mut help = command.clone();
                write!(self.output, "{}", help.render_long_help())?;
                self.output.flush()?;
                Ok(())
            }
        }
    }

    /// Run over `args` and map the outcome to an exit status.
    ///
    /// Failures are printed to stderr; the status is 0 on success and 1 on
    /// any parse, pre-run, or command failure.
    pub fn execute_from<I, T>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.run_from(args) {
            Ok(()) => 0,
            Err(err) => {
                report(&err);
                1
            }
        }
    }

    /// Run over the process arguments and exit.
    pub fn execute(mut self) -> ! {
        let code = self.execute_from(std::env::args_os());
        let _ = self.output.flush();
        std::process::exit(code)
    }
}

/// Print a failure for the user.
fn report(err: &Error) {
    tracing::debug!(error = ?err, "command failed");
    match err {
        Error::Usage(usage) => {
            let _ = usage.print();
        }
        other => eprintln!("Error: {other}"),
    }
}

// ============================================================================
// Free-function entry points
// ============================================================================

/// Build a root command for `app_name` with optional application callbacks.
pub fn build_root_command(
    app_name: &str,
    register_flags: Option<CustomFlagFunc>,
    pre_run: Option<CustomPreRunFunc>,
) -> Result<RootCommand> {
    let mut base = CliBase::new(app_name);
    base.register_flags = register_flags;
    base.pre_run = pre_run;
    base.build()
}

/// Build a root command, attach `subcommands`, run it, and exit.
///
/// Meant to be called once, from `main`.
pub fn execute(
    app_name: &str,
    register_flags: Option<CustomFlagFunc>,
    pre_run: Option<CustomPreRunFunc>,
    subcommands: Vec<CliCommand>,
) -> ! {
    match build_root_command(app_name, register_flags, pre_run)
        .and_then(|root| root.with_subcommands(subcommands))
    {
        Ok(root) => root.execute(),
        Err(err) => {
            report(&err);
            std::process::exit(1)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
