//! Message counts per year, per sender and per sender-month.
//!
//! Rows with a null sender count toward yearly totals but are skipped by the
//! sender-keyed aggregations.

use std::collections::{BTreeMap, HashMap};

use crate::models::{JoinedMessage, MonthlySenderCount, MonthlyVolume, SenderCount, YearCount, YearMonth};

/// Messages per calendar year, ascending by year
#[must_use]
pub fn messages_per_year(rows: &[JoinedMessage]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.time.year).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// One `Messages in YYYY: N` line per year
#[must_use]
pub fn get_messages_per_year(rows: &[JoinedMessage]) -> Vec<String> {
    messages_per_year(rows).iter().map(ToString::to_string).collect()
}

/// Messages per sender, most active first.
///
/// Ties keep the order in which senders first appear.
#[must_use]
pub fn messages_per_sender(rows: &[JoinedMessage]) -> Vec<SenderCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SenderCount> = Vec::new();
    for sender in rows.iter().filter_map(|row| row.sender.as_deref()) {
        match index.get(sender) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(sender, counts.len());
                counts.push(SenderCount { sender: sender.to_string(), count: 1 });
            },
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `top_x` most active senders of every month.
///
/// Periods come out in ascending order; within a period senders are sorted
/// by descending count, ties by sender name.
#[must_use]
pub fn top_senders_by_month(rows: &[JoinedMessage], top_x: usize) -> Vec<MonthlySenderCount> {
    let mut grouped: BTreeMap<YearMonth, BTreeMap<&str, usize>> = BTreeMap::new();
    for row in rows {
        if let Some(sender) = row.sender.as_deref() {
            *grouped.entry(row.time.year_month).or_default().entry(sender).or_default() += 1;
        }
    }

    let mut result = Vec::new();
    for (year_month, senders) in grouped {
        let mut ranked: Vec<(&str, usize)> = senders.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        result.extend(ranked.into_iter().take(top_x).map(|(sender, count)| MonthlySenderCount {
            year_month,
            sender: sender.to_string(),
            count,
        }));
    }
    result
}

/// One sender's message count per month, ascending by period
#[must_use]
pub fn monthly_volume(rows: &[JoinedMessage], sender: &str) -> MonthlyVolume {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.sender.as_deref() == Some(sender)) {
        *counts.entry(row.time.year_month).or_default() += 1;
    }
    MonthlyVolume {
        sender: sender.to_string(),
        months: counts.into_iter().collect(),
    }
}
