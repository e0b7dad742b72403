//! Configuration file structure for `.segbench.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.segbench.toml` (user defaults)
//! - Project directory: `./.segbench.toml` (project defaults)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments
//! 2. Project config
//! 3. User config
//! 4. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use segbench_core::MatchThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the home and working directories.
pub const CONFIG_FILE_NAME: &str = ".segbench.toml";

pub const DEFAULT_MODEL: &str = "docling";
pub const DEFAULT_LABELS_DIR: &str = "labeled_data/benchmark_segmentation/dataset";
pub const DEFAULT_PDFS_DIR: &str = "pdfs";
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Written by `segbench config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# segbench configuration
#
# Command-line flags override this file; this file overrides ~/.segbench.toml.

[benchmark]
# Model name, used for the report file and the overlay directory
model = "docling"
# Ground truth: <labels_dir>/<document>/labels.json
labels_dir = "labeled_data/benchmark_segmentation/dataset"
# Source PDFs: <pdfs_dir>/<document>/document.pdf
pdfs_dir = "pdfs"
results_dir = "results"
# Write annotated PDF copies
visualize = true
# Worker threads (omit for one per CPU)
# parallel = 4

[thresholds]
# Percentages, all compared with a strict "greater than"
overlap = 20.0
containment = 90.0
merged_match = 50.0
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default settings for the `run` command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkSettings>,

    /// Matching thresholds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdfs_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,

    /// Write overlay PDFs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualize: Option<bool>,

    /// Worker thread count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub containment: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_match: Option<f64>,
}

impl BenchmarkSettings {
    /// Fill unset fields from `lower`.
    fn or(self, lower: Self) -> Self {
        Self {
            model: self.model.or(lower.model),
            labels_dir: self.labels_dir.or(lower.labels_dir),
            pdfs_dir: self.pdfs_dir.or(lower.pdfs_dir),
            results_dir: self.results_dir.or(lower.results_dir),
            visualize: self.visualize.or(lower.visualize),
            parallel: self.parallel.or(lower.parallel),
        }
    }
}

impl ThresholdSettings {
    fn or(self, lower: Self) -> Self {
        Self {
            overlap: self.overlap.or(lower.overlap),
            containment: self.containment.or(lower.containment),
            merged_match: self.merged_match.or(lower.merged_match),
        }
    }

    /// Apply the configured values over the built-in thresholds.
    #[must_use]
    pub fn resolve(&self) -> MatchThresholds {
        let defaults = MatchThresholds::default();
        MatchThresholds {
            overlap: self.overlap.unwrap_or(defaults.overlap),
            containment: self.containment.unwrap_or(defaults.containment),
            merged_match: self.merged_match.unwrap_or(defaults.merged_match),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            // TOML errors carry line/column information
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Run `segbench config init` for a commented example", "Help:".cyan().bold());
            anyhow::anyhow!("Failed to parse config file: {e}")
        })
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    #[must_use]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user_config = dirs::home_dir().and_then(|home| Self::load_optional(&home.join(CONFIG_FILE_NAME), "user"));
        let project_config = Self::load_optional(Path::new(CONFIG_FILE_NAME), "project");
        (user_config, project_config)
    }

    /// Load a config file if it exists; a broken file is reported and ignored.
    fn load_optional(path: &Path, scope: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load {} config from {}: {}",
                    "Warning:".yellow().bold(),
                    scope,
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Merge multiple configs with precedence
    /// project config > user config > defaults
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let user = user_config.unwrap_or_default();
        let project = project_config.unwrap_or_default();

        let benchmark = match (project.benchmark, user.benchmark) {
            (Some(project), Some(user)) => Some(project.or(user)),
            (project, user) => project.or(user),
        };
        let thresholds = match (project.thresholds, user.thresholds) {
            (Some(project), Some(user)) => Some(project.or(user)),
            (project, user) => project.or(user),
        };
        Self {
            benchmark,
            thresholds,
        }
    }

    #[must_use]
    pub fn benchmark_settings(&self) -> BenchmarkSettings {
        self.benchmark.clone().unwrap_or_default()
    }

    /// Thresholds with every unset value at its built-in default.
    #[must_use]
    pub fn match_thresholds(&self) -> MatchThresholds {
        self.thresholds.unwrap_or_default().resolve()
    }

    /// Fully resolved configuration, as printed by `config show`.
    #[must_use]
    pub fn effective(&self) -> Self {
        let benchmark = self.benchmark_settings().or(BenchmarkSettings {
            model: Some(DEFAULT_MODEL.to_string()),
            labels_dir: Some(PathBuf::from(DEFAULT_LABELS_DIR)),
            pdfs_dir: Some(PathBuf::from(DEFAULT_PDFS_DIR)),
            results_dir: Some(PathBuf::from(DEFAULT_RESULTS_DIR)),
            visualize: Some(true),
            parallel: None,
        });
        let thresholds = self.match_thresholds();
        Self {
            benchmark: Some(benchmark),
            thresholds: Some(ThresholdSettings {
                overlap: Some(thresholds.overlap),
                containment: Some(thresholds.containment),
                merged_match: Some(thresholds.merged_match),
            }),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Write the default template to `path`.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}
