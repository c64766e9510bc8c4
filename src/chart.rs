//! Text bar chart of one sender's monthly message volume.

use std::fmt::Write as _;

use crate::config::ChartConfig;
use crate::models::MonthlyVolume;

/// Horizontal axis label
pub const X_LABEL: &str = "Year-Month";
/// Vertical axis label
pub const Y_LABEL: &str = "Number of Messages";

/// Chart title for a sender
#[must_use]
pub fn chart_title(sender: &str) -> String {
    format!("Messages Sent by {sender}")
}

/// Length of the bar for `count`, scaled so that `max` fills `width`.
///
/// Any non-zero count gets at least one cell.
#[must_use]
pub fn bar_length(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count * width + max / 2) / max;
    scaled.clamp(1, width.max(1))
}

/// Render the chart, one bar per period in ascending order.
#[must_use]
pub fn render_bar_chart(volume: &MonthlyVolume, config: &ChartConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart_title(&volume.sender));

    if volume.months.is_empty() {
        let _ = writeln!(out, "(no messages)");
        return out;
    }

    let max = volume.months.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let _ = writeln!(out, "{X_LABEL} | {Y_LABEL}");
    for (period, count) in &volume.months {
        let bar = config.bar_symbol.repeat(bar_length(*count, max, config.width));
        let _ = writeln!(out, "{:<10} | {bar} {count}", period.to_string());
    }
    out
}
