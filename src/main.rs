use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use message_analysis_rust::config::AppConfig;
use message_analysis_rust::db::ChatDatabase;
use message_analysis_rust::file_writer::write_report;
use message_analysis_rust::logging::init_logging;
use message_analysis_rust::models::OutputFormat;
use message_analysis_rust::report::{write_bar_chart, write_chats, write_leaderboard, write_messages_per_year, write_summary};
use message_analysis_rust::service::{AnalysisOptions, AnalysisService};
use message_analysis_rust::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None, subcommand_precedence_over_arg = true)]
struct Cli {
    /// Path to the chat.db file (falls back to `source.chat_db_path`)
    chat_db: Option<PathBuf>,

    /// Extra configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Zone for calendar fields: local or utc
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Keep senders that are phone numbers or email addresses
    #[arg(long, global = true)]
    keep_non_contacts: bool,

    /// Drop group conversations
    #[arg(long, global = true)]
    exclude_groups: bool,

    /// Drop one conversation (repeatable)
    #[arg(long = "exclude-chat", value_name = "ID", global = true)]
    exclude_chat: Vec<i64>,

    /// Only analyse one conversation
    #[arg(long, value_name = "ID", global = true)]
    chat: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Top senders overall and top senders per month (default)
    Summary {
        /// Number of senders in the overall ranking
        #[arg(short, long)]
        top: Option<usize>,

        /// Number of senders kept per month
        #[arg(short, long)]
        per_month: Option<usize>,
    },
    /// Message counts per calendar year
    Years,
    /// Cumulative leaderboard across monthly rankings
    Leaderboard {
        /// Number of senders kept per month
        #[arg(short, long)]
        per_month: Option<usize>,
    },
    /// Bar chart of one sender's messages per month
    Plot {
        /// Sender to chart
        #[arg(short, long)]
        sender: String,

        /// Bar width in columns
        #[arg(short, long)]
        width: Option<usize>,
    },
    /// One-on-one chat id per contact, and group chat ids
    Chats,
    /// Write the full report to files
    Export {
        /// Output format (txt, csv or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    // Initialize logging
    let log_file = config.logging.file_path.as_deref().map(Path::new);
    let guard = init_logging(Some(&config.get_log_level()), log_file, config.logging.format == "json")?;

    info!("Starting message-analysis");

    let Some(chat_db) = cli.chat_db.clone().or_else(|| config.chat_db_path()) else {
        writeln!(io::stderr(), "ERROR: Please provide the path to your chat.db file.")?;
        drop(guard);
        std::process::exit(1);
    };

    InputValidator::validate_chat_db_path(&chat_db)?;
    let db = ChatDatabase::open(&chat_db, config.wall_clock()?)
        .with_context(|| format!("Failed to open chat database at {}", chat_db.display()))?;

    let mut options = AnalysisOptions::from_config(&config.report);
    options.single_chat = cli.chat;
    debug!("Filters: {:?}", options.filters());

    let service = AnalysisService::new(db);
    let command = cli.command.unwrap_or(Commands::Summary { top: None, per_month: None });
    run_command(service, command, options, &config)?;

    drop(guard);
    Ok(())
}

/// Fold command-line flags into the loaded configuration
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(timezone) = &cli.timezone {
        config.source.timezone.clone_from(timezone);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.keep_non_contacts {
        config.report.remove_non_contacts = false;
    }
    if cli.exclude_groups {
        config.report.exclude_group_chats = true;
    }
    config.report.excluded_chat_ids.extend(cli.exclude_chat.iter().copied());
}

fn run_command(
    mut service: AnalysisService<ChatDatabase>, command: Commands, mut options: AnalysisOptions, config: &AppConfig,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Summary { top, per_month } => {
            if let Some(top) = top {
                InputValidator::validate_top_n(top)?;
                options.top_senders = top;
            }
            if let Some(per_month) = per_month {
                InputValidator::validate_top_n(per_month)?;
                options.top_per_month = per_month;
            }
            let report = service.analyze(&options)?;
            write_summary(&mut out, &report)?;
        },
        Commands::Years => {
            let report = service.analyze(&options)?;
            write_messages_per_year(&mut out, &report.messages_per_year)?;
        },
        Commands::Leaderboard { per_month } => {
            if let Some(per_month) = per_month {
                InputValidator::validate_top_n(per_month)?;
                options.top_per_month = per_month;
            }
            let report = service.analyze(&options)?;
            write_leaderboard(&mut out, &report.leaderboard)?;
        },
        Commands::Plot { sender, width } => {
            InputValidator::validate_sender_name(&sender)?;
            let mut chart = config.chart.clone();
            if let Some(width) = width {
                InputValidator::validate_chart_width(width)?;
                chart.width = width;
            }
            let volume = service.monthly_volume(&options, &sender)?;
            if volume.months.is_empty() {
                warn!("No messages found from sender: {}", sender);
            }
            write_bar_chart(&mut out, &volume, &chart)?;
        },
        Commands::Chats => {
            let classification = service.classify(&options)?;
            write_chats(&mut out, &classification)?;
        },
        Commands::Export { format, output_dir } => {
            let format = match format {
                Some(format) => format.parse::<OutputFormat>()?,
                None => config.output_format()?,
            };
            let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.report.output_directory));
            InputValidator::validate_output_dir(&output_dir)?;

            let report = service.analyze(&options)?;
            let files = write_report(&report, format, &output_dir)?;
            for file in &files {
                info!("Wrote {}", file.display());
            }
            info!("Exported {} {} files", files.len(), format.extension());
        },
    }

    out.flush()?;
    Ok(())
}
