use std::path::Path;

use crate::config::MAX_CHART_WIDTH;
use crate::error::{AnalysisError, Result};

fn invalid(message: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidInput(message.into())
}

/// Validation utilities for command-line input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the chat database path before opening it
    pub fn validate_chat_db_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(invalid("Chat database path cannot be empty"));
        }

        if !path.exists() {
            return Err(invalid(format!("Chat database path does not exist: {}", path.display())));
        }

        if !path.is_file() {
            return Err(invalid(format!("Chat database path is not a file: {}", path.display())));
        }

        Ok(())
    }

    /// Validate a top-N limit
    pub fn validate_top_n(n: usize) -> Result<()> {
        if n == 0 {
            return Err(invalid("Top-N limit must be greater than 0"));
        }

        if n > 10_000 {
            return Err(invalid("Top-N limit too large (max 10,000)"));
        }

        Ok(())
    }

    /// Validate the sender name passed to `plot`
    pub fn validate_sender_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("Sender name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(invalid("Sender name too long (max 100 characters)"));
        }

        // Check for potentially dangerous characters
        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("Sender name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate chart width
    pub fn validate_chart_width(width: usize) -> Result<()> {
        if !(1..=MAX_CHART_WIDTH).contains(&width) {
            return Err(invalid(format!("Chart width must be between 1 and {MAX_CHART_WIDTH}")));
        }

        Ok(())
    }

    /// Validate export output directory
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(invalid("Output directory cannot be empty"));
        }

        if path.is_file() {
            return Err(invalid(format!("Output directory is a file: {}", path.display())));
        }

        // Check path length
        if path.to_string_lossy().len() > 4096 {
            return Err(invalid("Output directory path too long (max 4096 characters)"));
        }

        Ok(())
    }
}
