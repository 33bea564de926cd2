//! Error types for clibase operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used by
//! the root command, by application pre-run hooks, and by command bodies.
//! Uses `thiserror` for derive macros.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or running a root command.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed arguments or unknown flags, as reported by clap.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// Failure reason reported by an application hook or command body.
    #[error("{0}")]
    Command(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Global flags were already registered on a root command sharing this store.
    #[error("Global flags are already registered; only one root command may be built per flags store")]
    FlagsAlreadyRegistered,

    /// Global flags were already parsed into this store.
    #[error("Global flags have already been parsed; a root command runs once")]
    FlagsAlreadySet,

    /// An application flag reuses the name of a global flag.
    #[error("Flag '{name}' conflicts with a global flag")]
    FlagConflict { name: String },

    /// A matched subcommand has no registered handler.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a command failure carrying the given reason verbatim.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for clap errors that are really help or version requests.
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Usage(e) => matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ),
            _ => false,
        }
    }
}

/// Result type alias using clibase's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_is_verbatim() {
        let err = Error::command("invalid config: missing token");
        assert_eq!(err.to_string(), "invalid config: missing token");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("bad value");
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let err = Error::ConfigNotFound {
            path: PathBuf::from("/etc/app/config.toml"),
        };
        assert!(err.to_string().contains("/etc/app/config.toml"));
    }

    #[test]
    fn test_flag_conflict_displays_name() {
        let err = Error::FlagConflict {
            name: "verbose".into(),
        };
        assert!(err.to_string().contains("'verbose'"));
    }

    #[test]
    fn test_io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_anyhow_error_is_transparent() {
        let err: Error = anyhow::anyhow!("upstream failed").into();
        assert_eq!(err.to_string(), "upstream failed");
    }

    #[test]
    fn test_is_informational() {
        let help = clap::Error::new(clap::error::ErrorKind::DisplayHelp);
        assert!(Error::from(help).is_informational());

        let unknown = clap::Error::new(clap::error::ErrorKind::UnknownArgument);
        assert!(!Error::from(unknown).is_informational());
        assert!(!Error::command("x").is_informational());
    }
}
