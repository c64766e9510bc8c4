//! File export for analysis reports.
//!
//! Writes a report as plain text, as one CSV file per section, or as a single
//! JSON document.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::error::Result;
use crate::models::OutputFormat;
use crate::report::write_full_report;
use crate::service::AnalysisReport;

/// Write `report` into `output_dir` in the given format.
///
/// # Returns
///
/// Paths of the files created
pub fn write_report(report: &AnalysisReport, format: OutputFormat, output_dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir_all(output_dir)?;

    match format {
        OutputFormat::Txt => {
            let file_path = output_dir.join("report.txt");
            write_txt_file(report, &file_path)?;
            Ok(vec![file_path])
        },
        OutputFormat::Csv => {
            let files = vec![
                write_csv_file(&report.messages_per_year, &output_dir.join("messages_per_year.csv"))?,
                write_csv_file(&report.top_senders, &output_dir.join("top_senders.csv"))?,
                write_csv_file(&report.top_senders_by_month, &output_dir.join("top_senders_by_month.csv"))?,
                write_csv_file(&report.leaderboard, &output_dir.join("leaderboard.csv"))?,
            ];
            Ok(files)
        },
        OutputFormat::Json => {
            let file_path = output_dir.join("report.json");
            write_json_file(report, &file_path)?;
            Ok(vec![file_path])
        },
    }
}

fn write_txt_file(report: &AnalysisReport, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    write_full_report(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}

/// Header row comes from the record's field names
fn write_csv_file<T: Serialize>(rows: &[T], file_path: &Path) -> Result<PathBuf> {
    let mut writer = Writer::from_path(file_path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(file_path.to_path_buf())
}

fn write_json_file(report: &AnalysisReport, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
