use serde::Serialize;
use tracing::info;

use crate::aggregate::{messages_per_sender, messages_per_year, monthly_volume, top_senders_by_month};
use crate::classify::ChatClassification;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::filters::ChatFilter;
use crate::join::merge_data;
use crate::logging::OperationTimer;
use crate::metrics::PipelineMetrics;
use crate::models::{
    ChatId, JoinedMessage, LeaderboardEntry, MonthlySenderCount, MonthlyVolume, SenderCount, YearCount,
};
use crate::rank::leaderboard;
use crate::repository::MessageSource;

/// Which rows to keep and how many senders to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Drop phone-number, email and null senders
    pub remove_non_contacts: bool,
    /// Drop group conversations
    pub exclude_groups: bool,
    /// Conversations to drop
    pub excluded_chat_ids: Vec<ChatId>,
    /// Keep only this conversation
    pub single_chat: Option<ChatId>,
    /// Senders kept in the overall ranking
    pub top_senders: usize,
    /// Senders kept per month, and so ranked on the leaderboard
    pub top_per_month: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&crate::config::AppConfig::default().report)
    }
}

impl AnalysisOptions {
    /// Options from the `report` config section, with no single chat selected
    #[must_use]
    pub fn from_config(report: &ReportConfig) -> Self {
        Self {
            remove_non_contacts: report.remove_non_contacts,
            exclude_groups: report.exclude_group_chats,
            excluded_chat_ids: report.excluded_chat_ids.clone(),
            single_chat: None,
            top_senders: report.top_senders,
            top_per_month: report.top_per_month,
        }
    }

    /// Filter chain in the order it is applied
    #[must_use]
    pub fn filters(&self) -> Vec<ChatFilter> {
        let mut filters = Vec::new();
        if self.remove_non_contacts {
            filters.push(ChatFilter::RemoveNonContacts);
        }
        filters.extend(self.excluded_chat_ids.iter().copied().map(ChatFilter::ExcludeChat));
        if self.exclude_groups {
            filters.push(ChatFilter::ExcludeGroups);
        }
        if let Some(chat_id) = self.single_chat {
            filters.push(ChatFilter::SingleChat(chat_id));
        }
        filters
    }
}

/// Everything one run computes, ready for printing or export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Rows left after filtering
    pub total_messages: usize,
    /// Messages per calendar year, ascending
    pub messages_per_year: Vec<YearCount>,
    /// Limit applied to `top_senders`
    pub sender_limit: usize,
    /// Most active senders overall
    pub top_senders: Vec<SenderCount>,
    /// Limit applied per month
    pub per_month_limit: usize,
    /// Most active senders of every month
    pub top_senders_by_month: Vec<MonthlySenderCount>,
    /// Cumulative scores across months
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl AnalysisReport {
    /// Aggregate and rank an already filtered table
    pub fn build(rows: &[JoinedMessage], options: &AnalysisOptions) -> Self {
        let mut top_senders = messages_per_sender(rows);
        top_senders.truncate(options.top_senders);
        let top_senders_by_month = top_senders_by_month(rows, options.top_per_month);
        let leaderboard = leaderboard(&top_senders_by_month);

        Self {
            total_messages: rows.len(),
            messages_per_year: messages_per_year(rows),
            sender_limit: options.top_senders,
            top_senders,
            per_month_limit: options.top_per_month,
            top_senders_by_month,
            leaderboard,
        }
    }
}

/// Runs load, join, filter and aggregate over a message source
pub struct AnalysisService<S: MessageSource> {
    source: S,
    metrics: PipelineMetrics,
}

impl<S: MessageSource> AnalysisService<S> {
    /// Wrap a message source
    pub fn new(source: S) -> Self {
        Self {
            source,
            metrics: PipelineMetrics::default(),
        }
    }

    /// Load the three tables and join them
    pub fn load_joined(&mut self) -> Result<Vec<JoinedMessage>> {
        let timer = OperationTimer::new("load");
        let messages = self.source.load_messages()?;
        let handles = self.source.load_handles()?;
        let links = self.source.load_chat_message_links()?;
        self.metrics.record_load(messages.len(), handles.len(), links.len());
        self.metrics.record_stage("load", timer.finish());

        let timer = OperationTimer::new("join");
        let joined = merge_data(&messages, &handles, &links);
        self.metrics.record_join(joined.len());
        self.metrics.record_stage("join", timer.finish());

        info!("Joined {} messages into {} rows", messages.len(), joined.len());
        Ok(joined)
    }

    /// Apply the configured filter chain
    pub fn apply_filters(&mut self, mut rows: Vec<JoinedMessage>, options: &AnalysisOptions) -> Vec<JoinedMessage> {
        let timer = OperationTimer::new("filter");
        for filter in options.filters() {
            let before = rows.len();
            rows = filter.apply(rows);
            self.metrics.record_filter(filter.name(), before, rows.len());
        }
        self.metrics.record_stage("filter", timer.finish());
        rows
    }

    /// Load, join and filter
    pub fn filtered_rows(&mut self, options: &AnalysisOptions) -> Result<Vec<JoinedMessage>> {
        let joined = self.load_joined()?;
        Ok(self.apply_filters(joined, options))
    }

    /// Full run: load, join, filter, aggregate and rank
    pub fn analyze(&mut self, options: &AnalysisOptions) -> Result<AnalysisReport> {
        let rows = self.filtered_rows(options)?;

        let timer = OperationTimer::new("aggregate");
        let report = AnalysisReport::build(&rows, options);
        self.metrics.record_stage("aggregate", timer.finish());

        self.metrics.log_summary();
        Ok(report)
    }

    /// Classify the conversations that survive the filters
    pub fn classify(&mut self, options: &AnalysisOptions) -> Result<ChatClassification> {
        let rows = self.filtered_rows(options)?;
        Ok(ChatClassification::classify(&rows))
    }

    /// Monthly message counts for one sender
    pub fn monthly_volume(&mut self, options: &AnalysisOptions, sender: &str) -> Result<MonthlyVolume> {
        let rows = self.filtered_rows(options)?;
        Ok(monthly_volume(&rows, sender))
    }

    /// Tallies recorded so far
    pub const fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}
