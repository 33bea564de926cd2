//! clibase Core: shared types, traits, and errors.
//!
//! This crate provides the foundational types used by `clibase-cli` and by
//! the applications built on it. It has no internal clibase dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`flags`]: Global flags record and its write-once store
//! - [`invocation`]: Context handed to pre-run hooks and command bodies
//! - [`traits`]: Extension traits for command bodies

#![doc = include_str!("../README.md")]

pub mod error;
pub mod flags;
pub mod invocation;
pub mod traits;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use flags::{FlagsStore, GlobalFlags};
pub use invocation::Invocation;
pub use traits::CommandHandler;
