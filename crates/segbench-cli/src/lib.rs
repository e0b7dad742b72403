//! Command-line runner for layout segmentation benchmarks
//!
//! This crate provides the `segbench` command-line tool. It scores a
//! directory of model predictions against ground-truth labels, writes a
//! markdown report and, optionally, annotated copies of the source PDFs.
//!
//! # Quick Start
//!
//! ```bash
//! # Benchmark all predictions of a model
//! segbench run predictions/lightgbm --model lightgbm
//!
//! # Skip the overlay PDFs, also write JSON and CSV reports
//! segbench run predictions/lightgbm --model lightgbm --no-visualize --json --csv
//!
//! # Show the effective configuration
//! segbench config show
//! ```
//!
//! # Directory Layout
//!
//! | Path | Content |
//! |------|---------|
//! | `<predictions>/<doc>.json` | model output for one document |
//! | `<labels_dir>/<doc>/labels.json` | ground truth |
//! | `<pdfs_dir>/<doc>/document.pdf` | source PDF for overlays |
//! | `<results_dir>/<model>.md` | report table |
//! | `<results_dir>/<model>/<doc>.pdf` | overlay |
//!
//! # Configuration
//!
//! Defaults can be set in `./.segbench.toml` or `~/.segbench.toml`; see
//! [`config`]. Command-line flags always win.

pub mod config;
pub mod dataset;
pub mod overlay;
pub mod report;
pub mod runner;
