//! Configuration loader facade.
//!
//! Merge order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. Global file (`$XDG_CONFIG_HOME/appshots/config.toml`)
//! 3. Workspace file (`<workspace>/.appshots/config.toml`)
//! 4. `APPSHOTS_` environment variables, `__` between nested keys
//!    (e.g. `APPSHOTS_REVIEW__OUTPUT_DIR`)

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::ShotsConfig;
use config::{ConfigError, Environment, File};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the merged configuration for a workspace.
    pub fn load(workspace_root: &Path) -> Result<ShotsConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(environment());

        let config: ShotsConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load a single explicit file over the defaults. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<ShotsConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn default() -> ShotsConfig {
        ShotsConfig::default()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APPSHOTS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
