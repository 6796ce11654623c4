//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ShotsError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ShotsError) -> String {
    match e {
        ShotsError::Config(_) | ShotsError::Watch(_) => e.to_string(),
        _ => format!("Error: {}", e),
    }
}
