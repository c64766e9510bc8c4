use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::models::OutputFormat;
use crate::utils::WallClock;

/// Widest bar chart accepted from config or the command line
pub const MAX_CHART_WIDTH: usize = 500;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Where the chat database lives and how its dates are read
    pub source: SourceConfig,
    /// Log level, format and optional file
    pub logging: LoggingConfig,
    /// Filters and report limits
    pub report: ReportConfig,
    /// Text bar chart appearance
    pub chart: ChartConfig,
}

/// `source` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Path to `chat.db`, empty when unset
    pub chat_db_path: String,
    /// Zone for calendar fields: "local" or "utc"
    pub timezone: String,
}

/// `logging` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Daily-rolling JSON log file
    #[serde(default)]
    pub file_path: Option<String>,
    /// Console format: "json" or "text"
    pub format: String,
}

/// `report` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Senders kept in the overall ranking
    pub top_senders: usize,
    /// Senders kept per month
    pub top_per_month: usize,
    /// Drop phone-number, email and null senders
    pub remove_non_contacts: bool,
    /// Drop group conversations
    pub exclude_group_chats: bool,
    /// Conversations dropped before analysis.
    ///
    /// The config crate drops empty arrays when layering, so the default
    /// never reaches deserialization.
    #[serde(default)]
    pub excluded_chat_ids: Vec<i64>,
    /// Export format: txt, csv or json
    pub output_format: String,
    /// Directory export files are written to
    pub output_directory: String,
}

/// `chart` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartConfig {
    /// Columns used by the longest bar
    pub width: usize,
    /// Glyph repeated to draw a bar
    pub bar_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                chat_db_path: String::new(),
                timezone: "local".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            report: ReportConfig {
                top_senders: 20,
                top_per_month: 5,
                remove_non_contacts: true,
                exclude_group_chats: false,
                excluded_chat_ids: Vec::new(),
                output_format: "txt".to_string(),
                output_directory: "./output".to_string(),
            },
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 50,
            bar_symbol: "\u{2588}".to_string(), // █
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config files and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional explicit file layered above the
    /// default config files and below the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // e.g. MESSAGE_ANALYSIS__REPORT__TOP_SENDERS=10
            .add_source(
                Environment::with_prefix("MESSAGE_ANALYSIS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.wall_clock()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        if self.report.top_senders == 0 {
            return Err(AnalysisError::InvalidConfig("top_senders must be greater than 0".to_string()));
        }
        if self.report.top_per_month == 0 {
            return Err(AnalysisError::InvalidConfig("top_per_month must be greater than 0".to_string()));
        }
        self.output_format()?;

        if !(1..=MAX_CHART_WIDTH).contains(&self.chart.width) {
            return Err(AnalysisError::InvalidConfig(format!(
                "chart width must be between 1 and {MAX_CHART_WIDTH}"
            )));
        }
        if self.chart.bar_symbol.is_empty() {
            return Err(AnalysisError::InvalidConfig("chart bar_symbol cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Get the chat database path from environment or config, if any
    pub fn chat_db_path(&self) -> Option<PathBuf> {
        std::env::var("IMESSAGE_DB_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| Some(self.source.chat_db_path.clone()).filter(|p| !p.is_empty()))
            .map(PathBuf::from)
    }

    /// Zone calendar fields are derived in
    pub fn wall_clock(&self) -> Result<WallClock> {
        self.source.timezone.parse()
    }

    /// Default export format
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.report
            .output_format
            .parse()
            .map_err(|_| AnalysisError::InvalidConfig(format!("Invalid export format: {}", self.report.output_format)))
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
