//! Message Analysis - who do I message most, and when
//!
//! A Rust library for ranking messaging activity in an iMessage-style
//! `chat.db`: per-sender totals, per-month leaderboards and monthly volume
//! charts.
//!
//! # Features
//!
//! - Load messages, handles and chat membership links from `chat.db`
//! - Join them into one table with sender and conversation per message
//! - Filter out non-contact senders, group chats or specific conversations
//! - Count per year, per sender and per sender-month
//! - Score a cumulative leaderboard across months
//! - Print summaries or export them as TXT, CSV or JSON

/// Per-year, per-sender and per-month counts
pub mod aggregate;
/// Text bar charts
pub mod chart;
/// One-on-one vs group conversation classification
pub mod classify;
/// Configuration management
pub mod config;
/// Chat database access
pub mod db;
/// Error types
pub mod error;
/// Report export to files
pub mod file_writer;
/// Row filters
pub mod filters;
/// Joining messages with handles and chats
pub mod join;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Cumulative leaderboard scoring
pub mod rank;
/// Plain-text summaries
pub mod report;
/// Message source abstraction
pub mod repository;
/// Chat database schema definitions
pub mod schema;
/// End-to-end analysis pipeline
pub mod service;
/// Timestamp conversion
pub mod utils;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use db::ChatDatabase;
pub use error::{AnalysisError, Result};
pub use models::{JoinedMessage, LeaderboardEntry, OutputFormat, YearMonth};
pub use service::{AnalysisOptions, AnalysisReport, AnalysisService};
