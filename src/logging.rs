//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format, and destination
//! come from configuration, `APPSHOTS_LOG*` environment variables, and CLI
//! flags. Logs default to stderr so stdout stays free for command output.

use crate::error::ShotsError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to suppress all log output
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes "file"; defaults under the user
    /// data directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Default log file: `<user data dir>/appshots/appshots.log`.
pub fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "appshots")
        .map(|dirs| dirs.data_dir().join("appshots.log"))
        .unwrap_or_else(|| PathBuf::from(".appshots").join("appshots.log"))
}

/// Pick the log file: explicit CLI path, then configured path, then default.
pub fn resolve_log_file_path(cli_file: Option<PathBuf>, config_file: Option<PathBuf>) -> PathBuf {
    cli_file.or(config_file).unwrap_or_else(default_log_file)
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (APPSHOTS_LOG, APPSHOTS_LOG_FORMAT, ...)
/// 2. CLI arguments and configuration file, already merged into `config`
/// 3. Defaults
///
/// Does nothing when logging is disabled. Fails if a global subscriber is
/// already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ShotsError> {
    let default_config = LoggingConfig::default();
    let config = config.unwrap_or(&default_config);
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let writer = if output.file {
        let log_file = config.file.clone().unwrap_or_else(default_log_file);
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShotsError::io("create log directory", parent, e))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| ShotsError::io("open log file", &log_file, e))?;
        let file = Arc::new(file);
        if output.stderr {
            BoxMakeWriter::new(std::io::stderr.and(file))
        } else {
            BoxMakeWriter::new(file)
        }
    } else if output.stdout {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    let use_color = config.color && !output.file;

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| ShotsError::Config(format!("Failed to install logger: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ShotsError> {
    if let Ok(filter) = EnvFilter::try_from_env("APPSHOTS_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        filter = filter.add_directive(parse_directive(module, module_level)?);
    }

    if let Ok(modules_str) = std::env::var("APPSHOTS_LOG_MODULES") {
        for module_spec in modules_str.split(',') {
            if let Some((module, level)) = module_spec.split_once('=') {
                filter = filter.add_directive(parse_directive(module, level)?);
            }
        }
    }

    Ok(filter)
}

fn parse_directive(
    module: &str,
    level: &str,
) -> Result<tracing_subscriber::filter::Directive, ShotsError> {
    format!("{}={}", module.trim(), level.trim())
        .parse()
        .map_err(|e| ShotsError::Config(format!("Invalid log directive: {}", e)))
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, ShotsError> {
    if let Ok(format) = std::env::var("APPSHOTS_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(ShotsError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: &LoggingConfig) -> Result<OutputDestinations, ShotsError> {
    if let Ok(output) = std::env::var("APPSHOTS_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    parse_output_destinations(&config.output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ShotsError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        _ => {
            return Err(ShotsError::Config(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
