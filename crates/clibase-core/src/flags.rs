//! Global flags shared by every command of a root command tree.
//!
//! Provides [`GlobalFlags`], the parsed values of `--verbose` and `--config`,
//! and [`FlagsStore`], the write-once handle through which the root command
//! publishes them.
//!
//! # Design
//!
//! The store is injected into the root command rather than living in a
//! process-wide static. It is written exactly once, by the parsing phase,
//! and read thereafter by the pre-run hook, by command bodies (through
//! [`Invocation`](crate::Invocation)), and by any application code holding a
//! clone of the store.
//!
//! # Example
//!
//! ```
//! use clibase_core::{FlagsStore, GlobalFlags};
//!
//! let store = FlagsStore::new();
//! assert!(store.get().is_none());
//!
//! store
//!     .set(GlobalFlags {
//!         verbose: true,
//!         config_file: "app.toml".into(),
//!     })
//!     .unwrap();
//!
//! assert!(store.flags().verbose);
//! assert_eq!(store.flags().config_path(), Some("app.toml"));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::{Error, Result};

/// Values of the global flags after argument parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    /// Set by `-v/--verbose`.
    pub verbose: bool,

    /// Set by `-c/--config <PATH>`; empty when omitted.
    pub config_file: String,
}

impl GlobalFlags {
    /// The config file path, or `None` when `--config` was not given.
    pub fn config_path(&self) -> Option<&str> {
        if self.config_file.is_empty() {
            None
        } else {
            Some(&self.config_file)
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    registered: AtomicBool,
    flags: OnceLock<GlobalFlags>,
}

/// Write-once store for [`GlobalFlags`].
///
/// Cloning is cheap (Arc clone); every clone observes the same record.
#[derive(Debug, Clone, Default)]
pub struct FlagsStore {
    inner: Arc<Inner>,
}

impl FlagsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the global flags have been registered on a root command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FlagsAlreadyRegistered`] on the second call.
    pub fn mark_registered(&self) -> Result<()> {
        if self.inner.registered.swap(true, Ordering::SeqCst) {
            return Err(Error::FlagsAlreadyRegistered);
        }
        Ok(())
    }

    /// Whether a root command has registered its flags against this store.
    pub fn is_registered(&self) -> bool {
        self.inner.registered.load(Ordering::SeqCst)
    }

    /// Publish the parsed flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FlagsAlreadySet`] if flags were already published.
    pub fn set(&self, flags: GlobalFlags) -> Result<()> {
        self.inner
            .flags
            .set(flags)
            .map_err(|_| Error::FlagsAlreadySet)
    }

    /// The parsed flags, or `None` before parsing.
    pub fn get(&self) -> Option<&GlobalFlags> {
        self.inner.flags.get()
    }

    /// The parsed flags, or the defaults before parsing.
    pub fn flags(&self) -> GlobalFlags {
        self.get().cloned().unwrap_or_default()
    }
}
