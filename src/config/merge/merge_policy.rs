//! Merge rules: defaults first, later sources override earlier ones.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("plan.path", ".appshots/plan.json")?
        .set_default("review.raw_dir", "./screenshots/raw")?
        .set_default("review.framed_dir", "./screenshots/framed")?
        .set_default("review.output_dir", "./screenshots/review")?
        .set_default("backend.axe_bin", "axe")?
        .set_default("backend.xcrun_bin", "xcrun")
}
