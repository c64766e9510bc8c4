//! Data models for message analysis
//!
//! This module contains the raw records read from the chat database, the
//! denormalized row every pipeline stage works on, and the result rows the
//! aggregators and ranker produce.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::AnalysisError;

/// Conversation identifier (`chat_message_join.chat_id`)
pub type ChatId = i64;

/// Message identifier (`message.ROWID`)
pub type MessageId = i64;

/// Calendar-month bucket used for monthly aggregation.
///
/// Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a period from a year and a 1-based month
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Period containing the given date
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Calendar year
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12)
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidInput(format!("Invalid year-month: {s}, use YYYY-MM"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self::new(year, month))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A converted timestamp and the calendar fields derived from it.
///
/// Every field is computed from `timestamp`, never from the raw stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTime {
    /// Wall-clock time in the configured zone
    pub timestamp: NaiveDateTime,
    /// Calendar date
    pub date: NaiveDate,
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
    /// Year-month period
    pub year_month: YearMonth,
}

impl MessageTime {
    /// Decompose a wall-clock timestamp
    #[must_use]
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            year: timestamp.year(),
            month: timestamp.month(),
            hour: timestamp.hour(),
            minute: timestamp.minute(),
            year_month: YearMonth::of(&timestamp),
        }
    }
}

/// A row of the `message` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// `message.ROWID`
    pub message_id: MessageId,
    /// Message text content
    pub text: Option<String>,
    /// Reference to the sender's handle (0 when there is none)
    pub handle_id: i64,
    /// Stored timestamp, nanoseconds since the 2001 reference epoch
    pub raw_date: i64,
    /// Converted timestamp and derived fields
    pub time: MessageTime,
    /// True if the message was sent by the owner of the database
    pub is_sent: bool,
}

/// A row of the `handle` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    /// `handle.ROWID`
    pub handle_id: i64,
    /// Sender identity: contact name, phone number or email
    pub sender: String,
}

/// A row of the `chat_message_join` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMessageLink {
    /// Conversation id
    pub chat_id: ChatId,
    /// Message id
    pub message_id: MessageId,
}

/// A message joined with its sender identity and conversation id.
///
/// `sender` is `None` when no handle matched, `chat_id` is `None` when no
/// membership link matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedMessage {
    /// Message id
    pub message_id: MessageId,
    /// Message text content
    pub text: Option<String>,
    /// Reference to the sender's handle
    pub handle_id: i64,
    /// Stored timestamp, nanoseconds since the 2001 reference epoch
    pub raw_date: i64,
    /// Converted timestamp and derived fields
    pub time: MessageTime,
    /// True if the message was sent by the owner of the database
    pub is_sent: bool,
    /// Sender identity
    pub sender: Option<String>,
    /// Conversation id
    pub chat_id: Option<ChatId>,
}

impl JoinedMessage {
    /// Attach sender and conversation to a loaded message
    #[must_use]
    pub fn from_message(message: &Message, sender: Option<String>, chat_id: Option<ChatId>) -> Self {
        Self {
            message_id: message.message_id,
            text: message.text.clone(),
            handle_id: message.handle_id,
            raw_date: message.raw_date,
            time: message.time,
            is_sent: message.is_sent,
            sender,
            chat_id,
        }
    }
}

/// Number of messages in one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    /// Calendar year
    pub year: i32,
    /// Messages in that year
    pub count: usize,
}

impl fmt::Display for YearCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Messages in {}: {}", self.year, self.count)
    }
}

/// Total messages for one sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderCount {
    /// Sender identity
    pub sender: String,
    /// Messages from that sender
    pub count: usize,
}

/// One row of the top-N-per-month table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySenderCount {
    /// Period
    pub year_month: YearMonth,
    /// Sender identity
    pub sender: String,
    /// Messages from that sender in the period
    pub count: usize,
}

/// Accumulated leaderboard score for one sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Sender identity
    pub sender: String,
    /// Sum of per-month scores, may be negative
    pub score: i64,
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.score)
    }
}

/// Messages per month for a single sender, in ascending period order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyVolume {
    /// Sender identity
    pub sender: String,
    /// `(period, count)` pairs
    pub months: Vec<(YearMonth, usize)>,
}

/// Output format for exported reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AnalysisError::InvalidInput(format!(
                "Invalid format: {other}. Must be one of: txt, csv, json"
            ))),
        }
    }
}
