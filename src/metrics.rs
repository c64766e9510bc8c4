use std::time::Duration;

use ::metrics::{counter, gauge, histogram};
use tracing::info;

/// Metric names
pub const ROWS_LOADED_TOTAL: &str = "message_analysis_rows_loaded_total";
pub const ROWS_JOINED: &str = "message_analysis_rows_joined";
pub const ROWS_DROPPED_TOTAL: &str = "message_analysis_rows_dropped_total";
pub const STAGE_DURATION_SECONDS: &str = "message_analysis_stage_duration_seconds";

/// Records pipeline metrics through the `metrics` facade and keeps local
/// tallies for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    pub messages_loaded: usize,
    pub handles_loaded: usize,
    pub links_loaded: usize,
    pub rows_joined: usize,
    pub rows_dropped: Vec<(&'static str, usize)>,
    pub stage_durations: Vec<(&'static str, Duration)>,
}

impl PipelineMetrics {
    /// Record the size of the three loaded tables
    pub fn record_load(&mut self, messages: usize, handles: usize, links: usize) {
        self.messages_loaded += messages;
        self.handles_loaded += handles;
        self.links_loaded += links;

        counter!(ROWS_LOADED_TOTAL, "table" => "message").increment(messages as u64);
        counter!(ROWS_LOADED_TOTAL, "table" => "handle").increment(handles as u64);
        counter!(ROWS_LOADED_TOTAL, "table" => "chat_message_join").increment(links as u64);
    }

    /// Record the size of the joined table
    pub fn record_join(&mut self, rows: usize) {
        self.rows_joined = rows;
        gauge!(ROWS_JOINED).set(rows as f64);
    }

    /// Record how many rows a filter removed
    pub fn record_filter(&mut self, filter: &'static str, before: usize, after: usize) {
        let dropped = before.saturating_sub(after);
        self.rows_dropped.push((filter, dropped));
        counter!(ROWS_DROPPED_TOTAL, "filter" => filter).increment(dropped as u64);
    }

    /// Record how long a pipeline stage took
    pub fn record_stage(&mut self, stage: &'static str, duration: Duration) {
        self.stage_durations.push((stage, duration));
        histogram!(STAGE_DURATION_SECONDS, "stage" => stage).record(duration.as_secs_f64());
    }

    /// Rows removed by all applications of `filter`
    pub fn dropped_by(&self, filter: &str) -> usize {
        self.rows_dropped
            .iter()
            .filter(|(name, _)| *name == filter)
            .map(|(_, n)| n)
            .sum()
    }

    /// Log a one-line summary of the run
    pub fn log_summary(&self) {
        let total_ms: u128 = self.stage_durations.iter().map(|(_, d)| d.as_millis()).sum();
        info!(
            messages = self.messages_loaded,
            handles = self.handles_loaded,
            links = self.links_loaded,
            joined = self.rows_joined,
            dropped = self.rows_dropped.iter().map(|(_, n)| n).sum::<usize>(),
            duration_ms = total_ms,
            "Pipeline finished"
        );
    }
}
