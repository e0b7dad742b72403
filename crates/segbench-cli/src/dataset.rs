//! Directory layout of a benchmark run.
//!
//! ```text
//! <predictions_dir>/<document>.json          model output
//! <labels_dir>/<document>/labels.json        ground truth
//! <pdfs_dir>/<document>/document.pdf         source PDF
//! <results_dir>/<model>.md                   report
//! <results_dir>/<model>/<document>.pdf       overlay
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where inputs are read from and outputs written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub labels_dir: PathBuf,
    pub pdfs_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl DatasetLayout {
    #[must_use]
    pub fn labels_path(&self, document_name: &str) -> PathBuf {
        self.labels_dir.join(document_name).join("labels.json")
    }

    #[must_use]
    pub fn pdf_path(&self, document_name: &str) -> PathBuf {
        self.pdfs_dir.join(document_name).join("document.pdf")
    }

    /// `<results_dir>/<model>.<extension>`
    #[must_use]
    pub fn report_path(&self, model: &str, extension: &str) -> PathBuf {
        self.results_dir.join(format!("{model}.{extension}"))
    }

    #[must_use]
    pub fn overlay_dir(&self, model: &str) -> PathBuf {
        self.results_dir.join(model)
    }

    #[must_use]
    pub fn overlay_path(&self, model: &str, document_name: &str) -> PathBuf {
        self.overlay_dir(model).join(format!("{document_name}.pdf"))
    }
}

/// One prediction file and the document it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PredictionFile {
    pub document_name: String,
    pub path: PathBuf,
}

impl PredictionFile {
    /// The document name is the file name without its `.json` extension.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let document_name = path.file_stem()?.to_str()?.to_string();
        Some(Self {
            document_name,
            path,
        })
    }
}

/// Every `*.json` file directly inside `predictions_dir`, sorted by name.
pub fn discover_predictions(predictions_dir: &Path) -> Result<Vec<PredictionFile>> {
    if !predictions_dir.is_dir() {
        anyhow::bail!(
            "Predictions directory not found: {}",
            predictions_dir.display()
        );
    }
    let escaped = glob::Pattern::escape(&predictions_dir.to_string_lossy());
    let pattern = format!("{escaped}/*.json");

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
        let path = entry.with_context(|| "Failed to read glob entry")?;
        if !path.is_file() {
            continue;
        }
        match PredictionFile::from_path(path) {
            Some(file) => files.push(file),
            None => log::warn!("Skipping prediction file with a non UTF-8 name"),
        }
    }
    files.sort();
    Ok(files)
}
