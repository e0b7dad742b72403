//! Report rendering: markdown table, JSON and CSV.
//!
//! All formats contain the document rows sorted by name followed by the
//! `Average` row.

use crate::dataset::DatasetLayout;
use anyhow::{Context, Result};
use segbench_core::{BenchmarkResult, CorpusReport};
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

/// Report columns, in output order.
pub const COLUMNS: [&str; 8] = [
    "document_name",
    "model",
    "labels",
    "not_found_labels",
    "wrong_segmentation",
    "wrong_token_type",
    "mistakes",
    "accuracy",
];

/// Spaces on each side of a markdown cell.
const PADDING: usize = 5;

/// Accuracy as shown in reports: at least one decimal, at most two.
#[must_use]
pub fn format_accuracy(accuracy: f64) -> String {
    if accuracy.fract() == 0.0 {
        format!("{accuracy:.1}")
    } else {
        format!("{accuracy}")
    }
}

fn cells(row: &BenchmarkResult) -> [String; 8] {
    [
        row.document_name.clone(),
        row.model.clone(),
        row.labels.to_string(),
        row.not_found_labels.to_string(),
        row.wrong_segmentation.to_string(),
        row.wrong_token_type.to_string(),
        row.mistakes.to_string(),
        format_accuracy(row.accuracy),
    ]
}

/// Format the report as a padded markdown table.
#[must_use = "formatted markdown is returned but not used"]
pub fn format_as_markdown(report: &CorpusReport) -> String {
    let rows: Vec<[String; 8]> = report.rows().map(cells).collect();
    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = " ".repeat(PADDING);
    let mut output = String::new();
    let mut line = |values: &[String]| {
        output.push('|');
        for (value, &width) in values.iter().zip(&widths) {
            let _ = write!(output, "{pad}{value:^width$}{pad}|");
        }
        output.push('\n');
    };

    line(&COLUMNS.map(String::from));
    line(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>());
    for row in &rows {
        line(row);
    }
    output
}

/// Format the report as JSON.
pub fn format_as_json(report: &CorpusReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Format the report as CSV.
#[must_use = "formatted CSV is returned but not used"]
pub fn format_as_csv(report: &CorpusReport) -> String {
    let mut output = COLUMNS.join(",");
    output.push('\n');
    for row in report.rows() {
        let values = cells(row).map(|cell| {
            if cell.contains([',', '"', '\n']) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell
            }
        });
        let _ = writeln!(output, "{}", values.join(","));
    }
    output
}

/// Which report files to write besides the markdown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReportFormats {
    pub json: bool,
    pub csv: bool,
}

/// Write `<results_dir>/<model>.md` and the requested extra formats.
///
/// Returns the written paths.
pub fn write_reports(report: &CorpusReport, layout: &DatasetLayout, formats: ReportFormats) -> Result<Vec<PathBuf>> {
    let results_dir = &layout.results_dir;
    fs::create_dir_all(results_dir)
        .with_context(|| format!("Failed to create results directory: {}", results_dir.display()))?;

    let mut outputs = vec![("md", format_as_markdown(report))];
    if formats.json {
        outputs.push(("json", format_as_json(report)?));
    }
    if formats.csv {
        outputs.push(("csv", format_as_csv(report)));
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (extension, content) in outputs {
        let path = layout.report_path(&report.model, extension);
        fs::write(&path, content).with_context(|| format!("Failed to write report: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
