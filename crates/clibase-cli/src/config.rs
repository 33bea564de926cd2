//! Config file helpers for clibase applications.
//!
//! The root command only records the `--config` value. Applications that
//! want a config file loaded call [`load_config`] from their pre-run hook.
//!
//! # Resolution Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `<APP>_CONFIG` environment variable
//! 3. XDG default: `~/.config/<app>/config.toml`

use std::path::{Path, PathBuf};

use clibase_core::{Error, GlobalFlags, Result};
use confyg::{Confygery, env};
use serde::de::DeserializeOwned;

// ============================================================================
// Naming
// ============================================================================

/// Environment prefix for `app_name`: upper-cased, non-alphanumerics as `_`.
pub fn env_prefix(app_name: &str) -> String {
    app_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Name of the env var that points at the config file, e.g. `MY_APP_CONFIG`.
pub fn config_env_var(app_name: &str) -> String {
    format!("{}_CONFIG", env_prefix(app_name))
}

/// Return the XDG default config path for `app_name`.
pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(app_name).join("config.toml"))
}

// ============================================================================
// Resolution
// ============================================================================

/// Where a config path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag.
    Flag(PathBuf),
    /// `<APP>_CONFIG` environment variable.
    Env(PathBuf),
    /// Platform default location.
    Default(PathBuf),
}

impl ConfigSource {
    /// The resolved path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::Default(p) => p,
        }
    }

    /// True when the user asked for this path, so it must exist.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, Self::Default(_))
    }
}

/// Resolve the config file path from the flag, env var, or XDG default.
pub fn resolve_config_path(app_name: &str, flags: &GlobalFlags) -> Option<ConfigSource> {
    let from_env = std::env::var_os(config_env_var(app_name))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_from(flags, from_env, default_config_path(app_name))
}

fn resolve_from(
    flags: &GlobalFlags,
    from_env: Option<PathBuf>,
    default: Option<PathBuf>,
) -> Option<ConfigSource> {
    if let Some(path) = flags.config_path() {
        return Some(ConfigSource::Flag(PathBuf::from(path)));
    }
    if let Some(path) = from_env {
        return Some(ConfigSource::Env(path));
    }
    default.map(ConfigSource::Default)
}

// ============================================================================
// Loading
// ============================================================================

/// Load `T` from the resolved config file and `<APP>_*` environment variables.
///
/// `T` should use `#[serde(default)]` so that a missing default file, or a
/// file that sets only some keys, still deserializes.
///
/// # Errors
///
/// - [`Error::ConfigNotFound`] if the path came from `--config` or the env
///   var and does not exist.
/// - [`Error::Config`] if the file cannot be read or deserialized.
pub fn load_config<T: DeserializeOwned>(app_name: &str, flags: &GlobalFlags) -> Result<T> {
    let source = resolve_config_path(app_name, flags);
    load_from(app_name, source.as_ref())
}

fn load_from<T: DeserializeOwned>(app_name: &str, source: Option<&ConfigSource>) -> Result<T> {
    let mut builder = Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

    if let Some(source) = source {
        let path = source.path();
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config file");
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        } else if source.is_explicit() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let env_opts = env::Options::with_top_level(&env_prefix(app_name));
    builder
        .add_env(env_opts)
        .map_err(|e| Error::config(format!("config env: {e}")))?;

    let config: T = builder
        .build()
        .map_err(|e| Error::config(format!("config build: {e}")))?;

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(default)]
    struct TestConfig {
        greeting: String,
        retries: u32,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                greeting: "Hello".to_string(),
                retries: 3,
            }
        }
    }

    /// RAII guard for env var manipulation in tests.
    struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    #[allow(unsafe_code)]
    impl EnvGuard {
        fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: each test sets a key no other test reads
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    #[allow(unsafe_code)]
    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: restores the key set in `EnvGuard::new`
            match &self.prev {
                Some(val) => unsafe { std::env::set_var(&self.key, val) },
                None => unsafe { std::env::remove_var(&self.key) },
            }
        }
    }

    fn flags_with(path: &str) -> GlobalFlags {
        GlobalFlags {
            verbose: false,
            config_file: path.to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Naming
    // ------------------------------------------------------------------------

    #[test]
    fn test_env_prefix() {
        assert_eq!(env_prefix("my-app"), "MY_APP");
        assert_eq!(env_prefix("tool2.cli"), "TOOL2_CLI");
    }

    #[test]
    fn test_config_env_var() {
        assert_eq!(config_env_var("my-app"), "MY_APP_CONFIG");
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path("my-app") {
            assert!(path.ends_with("my-app/config.toml"));
        }
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_prefers_flag() {
        let source = resolve_from(
            &flags_with("/flag.toml"),
            Some(PathBuf::from("/env.toml")),
            Some(PathBuf::from("/default.toml")),
        );
        assert_eq!(source, Some(ConfigSource::Flag(PathBuf::from("/flag.toml"))));
    }

    #[test]
    fn test_resolve_env_before_default() {
        let source = resolve_from(
            &GlobalFlags::default(),
            Some(PathBuf::from("/env.toml")),
            Some(PathBuf::from("/default.toml")),
        );
        assert_eq!(source, Some(ConfigSource::Env(PathBuf::from("/env.toml"))));
    }

    #[test]
    fn test_resolve_default() {
        let source = resolve_from(
            &GlobalFlags::default(),
            None,
            Some(PathBuf::from("/default.toml")),
        );
        let source = source.unwrap();
        assert_eq!(source.path(), Path::new("/default.toml"));
        assert!(!source.is_explicit());
    }

    #[test]
    fn test_resolve_nothing() {
        assert!(resolve_from(&GlobalFlags::default(), None, None).is_none());
    }

    #[test]
    fn test_resolve_config_path_uses_flag() {
        let source = resolve_config_path("clibase-resolve-test", &flags_with("x.toml")).unwrap();
        assert!(source.is_explicit());
        assert_eq!(source.path(), Path::new("x.toml"));
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                greeting = "Howdy"
                retries = 5
            "#,
        )
        .unwrap();

        let config: TestConfig =
            load_config("clibase-load-test", &flags_with(path.to_str().unwrap())).unwrap();
        assert_eq!(config.greeting, "Howdy");
        assert_eq!(config.retries, 5);
    }

    #[test]
    fn test_load_config_partial_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "greeting = \"Hi\"\n").unwrap();

        let config: TestConfig =
            load_config("clibase-partial-test", &flags_with(path.to_str().unwrap())).unwrap();
        assert_eq!(config.greeting, "Hi");
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn test_load_config_env_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "greeting = \"Hi\"\nretries = 7\n").unwrap();

        // confyg passes env values as strings, so only the string field is set.
        let _guard = EnvGuard::new("CLIBASEENV_GREETING", "Yo");
        let config: TestConfig =
            load_config("clibaseenv", &flags_with(path.to_str().unwrap())).unwrap();
        assert_eq!(config.greeting, "Yo");
        assert_eq!(config.retries, 7);
    }

    #[test]
    fn test_resolve_config_path_from_env_var() {
        let _guard = EnvGuard::new("CLIBASERESOLVE_CONFIG", "/env/app.toml");
        let source = resolve_config_path("clibaseresolve", &GlobalFlags::default());
        assert_eq!(source, Some(ConfigSource::Env(PathBuf::from("/env/app.toml"))));
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let result: Result<TestConfig> =
            load_config("clibase-missing-test", &flags_with("/nonexistent/config.toml"));
        match result {
            Err(Error::ConfigNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/config.toml"));
            }
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_config_missing_default_file_uses_defaults() {
        let source = ConfigSource::Default(PathBuf::from("/nonexistent/default/config.toml"));
        let config: TestConfig = load_from("clibase-default-test", Some(&source)).unwrap();
        assert_eq!(config.greeting, "Hello");
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn test_load_config_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retries = \"many\"\n").unwrap();

        let result: Result<TestConfig> =
            load_config("clibase-invalid-test", &flags_with(path.to_str().unwrap()));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
