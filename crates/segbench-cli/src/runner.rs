//! Batch benchmark over a predictions directory.
//!
//! Documents are independent: each one is loaded, scored and drawn on its
//! own rayon task, and the per-document outcomes are merged afterwards.

use crate::dataset::{discover_predictions, DatasetLayout, PredictionFile};
use crate::overlay;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;
use segbench_core::{
    benchmark_document, input, BenchmarkResult, CorpusReport, LabelFile, MatchThresholds, SegbenchError,
};
use std::path::PathBuf;
use std::time::Instant;

/// Everything a run needs, after config and CLI flags are merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub model: String,
    pub predictions_dir: PathBuf,
    pub layout: DatasetLayout,
    pub thresholds: MatchThresholds,
    /// Write annotated PDF copies
    pub visualize: bool,
    /// Worker threads; `None` uses one per CPU
    pub parallel: Option<usize>,
    pub show_progress: bool,
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStatus {
    /// Scored and reported.
    Scored(BenchmarkResult),
    /// Scored, but produced no result boxes, so it gets no report row.
    Empty,
    /// Ground truth missing.
    Skipped(String),
    /// Malformed input.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    pub document_name: String,
    pub status: DocumentStatus,
    /// Overlay written for this document, if any.
    pub overlay: Option<PathBuf>,
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report: CorpusReport,
    /// Per-document outcomes sorted by document name.
    pub documents: Vec<DocumentOutcome>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    fn count(&self, predicate: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.documents.iter().filter(|d| predicate(&d.status)).count()
    }

    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Scored(_)))
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Empty))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Skipped(_)))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Failed(_)))
    }

    /// Failed documents with their error messages.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().filter_map(|d| match &d.status {
            DocumentStatus::Failed(message) => Some((d.document_name.as_str(), message.as_str())),
            _ => None,
        })
    }
}

/// Benchmark one prediction file.
///
/// Never fails: missing ground truth and malformed input are reported in
/// the returned status so the batch can continue.
#[must_use]
pub fn benchmark_file(file: &PredictionFile, options: &RunOptions) -> DocumentOutcome {
    let name = file.document_name.as_str();
    let outcome = |status, overlay| DocumentOutcome {
        document_name: name.to_string(),
        status,
        overlay,
    };

    let labels_path = options.layout.labels_path(name);
    let labels = match LabelFile::from_path(&labels_path) {
        Ok(labels) => labels,
        Err(SegbenchError::MissingGroundTruth(path)) => {
            warn!("Label does not exist for: {name} ({})", path.display());
            return outcome(DocumentStatus::Skipped(format!("no labels at {}", path.display())), None);
        }
        Err(e) => {
            error!("{name}: {e}");
            return outcome(DocumentStatus::Failed(e.to_string()), None);
        }
    };

    let scored = input::load_predictions(&file.path)
        .and_then(|predictions| benchmark_document(&labels, &predictions, &options.thresholds));
    let boxes = match scored {
        Ok(boxes) => boxes,
        Err(e) => {
            error!("{name}: {e}");
            return outcome(DocumentStatus::Failed(e.to_string()), None);
        }
    };

    if boxes.is_empty() {
        info!("{name}: no result boxes, not reported");
        return outcome(DocumentStatus::Empty, None);
    }

    let overlay_path = if options.visualize {
        let source = options.layout.pdf_path(name);
        let target = options.layout.overlay_path(&options.model, name);
        if source.is_file() {
            match overlay::write_overlay(&source, &boxes, &target) {
                Ok(_) => Some(target),
                Err(e) => {
                    warn!("{name}: overlay not written: {e}");
                    None
                }
            }
        } else {
            warn!("{name}: source PDF not found at {}, no overlay", source.display());
            None
        }
    } else {
        None
    };

    let result = BenchmarkResult::from_result_boxes(name, options.model.as_str(), &boxes);
    info!(
        "{name}: {} labels, {} mistakes, accuracy {}",
        result.labels, result.mistakes, result.accuracy
    );
    outcome(DocumentStatus::Scored(result), overlay_path)
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Benchmark every prediction file in `options.predictions_dir`.
///
/// # Errors
///
/// Fails when the predictions directory is missing or empty, or the
/// worker pool cannot be built. Per-document problems are recorded in
/// the summary instead.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let files = discover_predictions(&options.predictions_dir)?;
    if files.is_empty() {
        anyhow::bail!(
            "No prediction files found in {}",
            options.predictions_dir.display()
        );
    }
    info!(
        "benchmarking {} documents for model {}",
        files.len(),
        options.model
    );

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.parallel {
        builder = builder.num_threads(threads.max(1));
    }
    let pool = builder.build().context("Failed to build worker pool")?;

    let progress = progress_bar(files.len(), options.show_progress);
    let start = Instant::now();
    let mut documents: Vec<DocumentOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let outcome = benchmark_file(file, options);
                progress.set_message(file.document_name.clone());
                progress.inc(1);
                outcome
            })
            .collect()
    });
    progress.finish_and_clear();
    documents.sort_by(|a, b| a.document_name.cmp(&b.document_name));

    let rows = documents
        .iter()
        .filter_map(|d| match &d.status {
            DocumentStatus::Scored(result) => Some(result.clone()),
            _ => None,
        })
        .collect();

    Ok(RunSummary {
        report: CorpusReport::new(options.model.as_str(), rows),
        documents,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
