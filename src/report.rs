//! Plain-text summaries written to any `io::Write` (stdout in the binary).

use std::io::{self, Write};

use crate::chart::render_bar_chart;
use crate::classify::ChatClassification;
use crate::config::ChartConfig;
use crate::models::{LeaderboardEntry, MonthlySenderCount, MonthlyVolume, SenderCount, YearCount};
use crate::service::AnalysisReport;

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(header.len())
}

/// `TOP N SENDERS` section
pub fn write_top_senders<W: Write>(out: &mut W, limit: usize, senders: &[SenderCount]) -> io::Result<()> {
    writeln!(out, "\nTOP {limit} SENDERS\n")?;
    let width = name_width(senders.iter().map(|s| s.sender.as_str()), "sender");
    for s in senders {
        writeln!(out, "{:<width$}  {}", s.sender, s.count)?;
    }
    Ok(())
}

/// `TOP N SENDERS PER MONTH` section; the period is printed once per block
pub fn write_top_senders_by_month<W: Write>(out: &mut W, limit: usize, rows: &[MonthlySenderCount]) -> io::Result<()> {
    writeln!(out, "\nTOP {limit} SENDERS PER MONTH")?;
    let width = name_width(rows.iter().map(|r| r.sender.as_str()), "sender");
    writeln!(out, "{:<10}  {:<width$}  messages", "year_month", "sender")?;

    let mut previous = None;
    for row in rows {
        let period = if previous == Some(row.year_month) {
            String::new()
        } else {
            row.year_month.to_string()
        };
        previous = Some(row.year_month);
        writeln!(out, "{period:<10}  {:<width$}  {}", row.sender, row.count)?;
    }
    Ok(())
}

/// One `Messages in YYYY: N` line per year
pub fn write_messages_per_year<W: Write>(out: &mut W, years: &[YearCount]) -> io::Result<()> {
    for year in years {
        writeln!(out, "{year}")?;
    }
    Ok(())
}

/// One `name: score` line per sender
pub fn write_leaderboard<W: Write>(out: &mut W, entries: &[LeaderboardEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}

/// The default two-section summary
pub fn write_summary<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    write_top_senders(out, report.sender_limit, &report.top_senders)?;
    write_top_senders_by_month(out, report.per_month_limit, &report.top_senders_by_month)
}

/// Every section of the report, as written to `report.txt`
pub fn write_full_report<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(out, "Total messages: {}\n", report.total_messages)?;
    write_messages_per_year(out, &report.messages_per_year)?;
    write_summary(out, report)?;
    writeln!(out, "\nLEADERBOARD (TOP {} PER MONTH)\n", report.per_month_limit)?;
    write_leaderboard(out, &report.leaderboard)
}

/// One-on-one lookup sorted by sender, then the group chat ids
pub fn write_chats<W: Write>(out: &mut W, classification: &ChatClassification) -> io::Result<()> {
    let mut dms: Vec<_> = classification.dm_chat_ids().into_iter().collect();
    dms.sort();

    writeln!(out, "\nONE-ON-ONE CHATS\n")?;
    for (sender, chat_id) in &dms {
        writeln!(out, "{sender}: {chat_id}")?;
    }

    writeln!(out, "\nGROUP CHATS\n")?;
    for chat_id in classification.group_chat_ids() {
        writeln!(out, "{chat_id}")?;
    }
    Ok(())
}

/// Bar chart of one sender's monthly volume
pub fn write_bar_chart<W: Write>(out: &mut W, volume: &MonthlyVolume, config: &ChartConfig) -> io::Result<()> {
    write!(out, "{}", render_bar_chart(volume, config))
}
