//! Configuration management for the migrator
//!
//! Settings are layered with figment: built-in defaults, an optional settings
//! file (TOML or JSON), `CONFIG_MIGRATOR_*` environment variables and finally
//! command-line flags.

pub mod core;
mod smart_load;

pub use self::core::{DEFAULT_CONFIG_FILES, ENV_PREFIX, MigratorConfig};
