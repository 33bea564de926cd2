//! Extension traits for clibase applications.
//!
//! Applications implement [`CommandHandler`] to provide the body of a
//! subcommand. Any closure taking an [`Invocation`] and returning
//! [`Result<()>`](crate::Result) already implements it.

use crate::{Invocation, Result};

/// Body of a command.
///
/// Called after the combined pre-run hook has succeeded.
///
/// # Example
///
/// ```
/// use clibase_core::{CommandHandler, Error, Invocation, Result};
///
/// struct Deploy {
///     dry_run_default: bool,
/// }
///
/// impl CommandHandler for Deploy {
///     fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
///         let target = invocation
///             .args()
///             .first()
///             .ok_or_else(|| Error::command("deploy requires a target"))?;
///         println!("deploying {target} (dry run: {})", self.dry_run_default);
///         Ok(())
///     }
/// }
/// ```
pub trait CommandHandler {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// The returned error is printed by the entry point and the process
    /// exits with status 1.
    fn run(&self, invocation: &Invocation<'_>) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&Invocation<'_>) -> Result<()>,
{
    fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
        self(invocation)
    }
}
